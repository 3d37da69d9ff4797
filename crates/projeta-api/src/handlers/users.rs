//! User account handlers.
//!
//! ## Endpoints
//! - GET /v1/api/users?q=&limit= - List or search users
//! - POST /v1/api/users - Create a user
//! - GET /v1/api/users/{id} - Fetch one user
//! - PATCH /v1/api/users/{id} - Update name/email/password/role
//! - DELETE /v1/api/users/{id} - Deactivate a user (soft delete)

use actix_web::{web, HttpRequest, HttpResponse};
use projeta_auth::password::{hash_password, validate_password};
use projeta_commons::models::User;
use projeta_commons::{GlobalRole, UserId};
use projeta_core::{AppContext, CoreError};
use serde::Deserialize;
use std::sync::Arc;

use super::run_blocking;
use crate::error::{map_auth_error_to_response, map_core_error_to_response};
use crate::identity::require_session;
use crate::models::UserRecord;

/// Body for POST /users and POST /auth/register.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// One of "admin", "manager", "developer"
    pub role: String,
}

/// Body for PATCH /users/{id}. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

fn invalid_state(message: String) -> HttpResponse {
    map_core_error_to_response(CoreError::InvalidState(message))
}

/// Validate, hash, and persist a new user. Shared with the public
/// register endpoint, which accepts the same body.
pub(crate) async fn create_user_from_request(
    ctx: &AppContext,
    req: CreateUserRequest,
) -> Result<UserRecord, HttpResponse> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(invalid_state("Name must not be empty".to_string()));
    }

    let email = req.email.trim().to_string();
    if !email.contains('@') {
        return Err(invalid_state(format!("Invalid email address: {}", email)));
    }

    let role = match GlobalRole::from_str_opt(&req.role) {
        Some(role) => role,
        None => return Err(invalid_state(format!("Invalid global role: {}", req.role))),
    };

    if let Err(e) = validate_password(&req.password) {
        return Err(map_auth_error_to_response(e));
    }
    let password_hash = match hash_password(&req.password, None).await {
        Ok(hash) => hash,
        Err(e) => return Err(map_auth_error_to_response(e)),
    };

    let id = match ctx.next_user_id() {
        Ok(id) => id,
        Err(e) => return Err(map_core_error_to_response(e)),
    };

    let now = chrono::Utc::now().timestamp_millis();
    let user = User {
        id,
        name,
        email,
        password_hash,
        role,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };

    if let Err(e) = ctx.users().create_user(user.clone()) {
        return Err(map_core_error_to_response(e));
    }

    log::info!("Created user {} with role {}", id, role);
    Ok(UserRecord::from_user(&user))
}

/// GET /v1/api/users
///
/// Blank or missing `q` lists everyone, name-ascending, up to the limit.
pub async fn list_users_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<UsersQuery>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let users = ctx.users();
    let q = query.q.clone().unwrap_or_default();
    let limit = query.limit;

    match run_blocking(move || users.search_users(&q, limit)).await {
        Ok(list) => {
            let records: Vec<UserRecord> = list.iter().map(UserRecord::from_user).collect();
            HttpResponse::Ok().json(records)
        }
        Err(e) => map_core_error_to_response(e),
    }
}

/// POST /v1/api/users
pub async fn create_user_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    body: web::Json<CreateUserRequest>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    match create_user_from_request(&ctx, body.into_inner()).await {
        Ok(record) => HttpResponse::Created().json(record),
        Err(resp) => resp,
    }
}

/// GET /v1/api/users/{id}
pub async fn get_user_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let user_id = UserId::new(path.into_inner());
    match ctx.users().get_active_user(&user_id) {
        Ok(Some(user)) => HttpResponse::Ok().json(UserRecord::from_user(&user)),
        Ok(None) => map_core_error_to_response(CoreError::NotFound(format!(
            "User not found: {}",
            user_id
        ))),
        Err(e) => map_core_error_to_response(e),
    }
}

/// PATCH /v1/api/users/{id}
pub async fn update_user_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
    body: web::Json<UpdateUserRequest>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let user_id = UserId::new(path.into_inner());
    let mut user = match ctx.users().get_active_user(&user_id) {
        Ok(Some(user)) => user,
        Ok(None) => {
            return map_core_error_to_response(CoreError::NotFound(format!(
                "User not found: {}",
                user_id
            )))
        }
        Err(e) => return map_core_error_to_response(e),
    };

    let patch = body.into_inner();

    if let Some(name) = patch.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return invalid_state("Name must not be empty".to_string());
        }
        user.name = name;
    }

    if let Some(email) = patch.email {
        let email = email.trim().to_string();
        if !email.contains('@') {
            return invalid_state(format!("Invalid email address: {}", email));
        }
        user.email = email;
    }

    if let Some(role_str) = patch.role {
        user.role = match GlobalRole::from_str_opt(&role_str) {
            Some(role) => role,
            None => return invalid_state(format!("Invalid global role: {}", role_str)),
        };
    }

    if let Some(password) = patch.password {
        if let Err(e) = validate_password(&password) {
            return map_auth_error_to_response(e);
        }
        user.password_hash = match hash_password(&password, None).await {
            Ok(hash) => hash,
            Err(e) => return map_auth_error_to_response(e),
        };
    }

    user.updated_at = chrono::Utc::now().timestamp_millis();

    match ctx.users().update_user(user.clone()) {
        Ok(()) => HttpResponse::Ok().json(UserRecord::from_user(&user)),
        Err(e) => map_core_error_to_response(e),
    }
}

/// DELETE /v1/api/users/{id}
///
/// Soft delete: the record stays for audit, but the account can no longer
/// authenticate and disappears from listings.
pub async fn delete_user_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let user_id = UserId::new(path.into_inner());
    match ctx.users().delete_user(&user_id) {
        Ok(()) => {
            log::info!("Deactivated user {}", user_id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => map_core_error_to_response(e),
    }
}
