//! Login handler
//!
//! POST /v1/api/auth/login - Verifies credentials and returns a JWT access token

use actix_web::{web, HttpResponse};
use projeta_auth::password::verify_password;
use projeta_auth::{create_and_sign_token, AuthError};
use projeta_core::AppContext;
use std::sync::Arc;

use super::models::{LoginRequest, LoginResponse};
use crate::error::{map_auth_error_to_response, map_core_error_to_response};
use crate::models::UserRecord;

/// POST /v1/api/auth/login
///
/// Unknown email and wrong password produce the same 401 so the endpoint
/// cannot be used to probe which accounts exist.
pub async fn login_handler(
    ctx: web::Data<Arc<AppContext>>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    let email = body.email.trim().to_string();

    let user = match ctx.users().get_user_by_email(&email) {
        Ok(Some(user)) => user,
        Ok(None) => {
            log::warn!("Failed login attempt for {}", email);
            return map_auth_error_to_response(AuthError::InvalidCredentials(
                "Invalid email or password".to_string(),
            ));
        }
        Err(e) => return map_core_error_to_response(e),
    };

    match verify_password(&body.password, &user.password_hash).await {
        Ok(true) => {}
        Ok(false) => {
            log::warn!("Failed login attempt for {}", email);
            return map_auth_error_to_response(AuthError::InvalidCredentials(
                "Invalid email or password".to_string(),
            ));
        }
        Err(e) => return map_auth_error_to_response(e),
    }

    let auth = ctx.auth();
    let (token, claims) = match create_and_sign_token(
        user.id,
        &user.email,
        user.role,
        Some(auth.token_ttl_minutes),
        &auth.jwt_secret,
    ) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Error generating JWT: {}", e);
            return map_auth_error_to_response(e);
        }
    };

    let expires_at = chrono::DateTime::from_timestamp(claims.exp as i64, 0)
        .unwrap_or_else(chrono::Utc::now)
        .to_rfc3339();

    log::info!("User {} logged in", user.id);

    HttpResponse::Ok().json(LoginResponse {
        access_token: token,
        expires_at,
        user: UserRecord::from_user(&user),
    })
}
