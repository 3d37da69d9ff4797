//! Login response model

use crate::models::UserRecord;
use serde::Serialize;

/// Login response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// JWT access token for Bearer authentication
    pub access_token: String,
    /// Access token expiration time in RFC3339 format
    pub expires_at: String,
    /// The authenticated user's record
    pub user: UserRecord,
}
