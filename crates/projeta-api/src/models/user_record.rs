//! User response records.

use super::millis_to_rfc3339;
use projeta_commons::models::User;
use projeta_commons::{GlobalRole, UserId};
use serde::Serialize;

/// Full user record for responses. The password hash is never serialized.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: GlobalRole,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRecord {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: millis_to_rfc3339(user.created_at),
            updated_at: millis_to_rfc3339(user.updated_at),
        }
    }
}

/// Compact user reference embedded in roster entries and project records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl UserSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
