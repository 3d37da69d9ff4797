//! HTTP request authentication extractor
//!
//! Resolves a Bearer token from the Authorization header into an
//! authenticated user, re-reading the stored record so the role is
//! never taken stale from the token.

use crate::error::{AuthError, AuthResult};
use crate::jwt::{validate_jwt_token, TokenType};
use crate::user_directory::UserDirectory;
use actix_web::HttpRequest;
use log::warn;
use projeta_commons::{CallerContext, User};
use std::sync::Arc;

/// Authenticated principal resolved from an HTTP request
#[derive(Debug, Clone)]
pub struct AuthenticatedRequest {
    /// The stored user record, re-read at request time
    pub user: User,
}

impl AuthenticatedRequest {
    /// Caller identity for authorization checks. The global role comes
    /// from the stored record, not from the token claims.
    pub fn context(&self) -> CallerContext {
        CallerContext::authenticated(self.user.id, self.user.role)
    }
}

/// Extract and validate a Bearer token from an HTTP request.
///
/// Validates the JWT (signature, expiry, issuer), confirms the token is
/// an access token, then re-reads the user through the directory.
/// Deleted and unknown accounts are rejected even when the token itself
/// is valid.
pub async fn authenticate_request(
    req: &HttpRequest,
    directory: &Arc<dyn UserDirectory>,
    secret: &str,
    trusted_issuers: &[String],
) -> AuthResult<AuthenticatedRequest> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| {
            AuthError::MissingAuthorization(
                "Authorization header is required. Use 'Authorization: Bearer <token>'"
                    .to_string(),
            )
        })?
        .to_str()
        .map_err(|_| {
            AuthError::MalformedAuthorization(
                "Authorization header contains invalid characters".to_string(),
            )
        })?;

    let token = auth_header
        .strip_prefix("Bearer")
        .ok_or_else(|| {
            AuthError::MalformedAuthorization(
                "Authorization header must start with 'Bearer '".to_string(),
            )
        })?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedAuthorization(
            "Bearer token missing".to_string(),
        ));
    }

    let claims = validate_jwt_token(token, secret, trusted_issuers)?;

    if claims.token_type != TokenType::Access {
        return Err(AuthError::InvalidCredentials(
            "Only access tokens are accepted".to_string(),
        ));
    }

    let user_id = claims.user_id()?;

    let user = directory.find_by_id(user_id).await?.ok_or_else(|| {
        warn!("Valid token presented for unknown user id {}", user_id);
        AuthError::InvalidCredentials("Unknown user".to_string())
    })?;

    if user.is_deleted() {
        return Err(AuthError::InvalidCredentials(
            "Account has been deactivated".to_string(),
        ));
    }

    Ok(AuthenticatedRequest { user })
}
