//! Registration handler
//!
//! POST /v1/api/auth/register - Public account creation

use actix_web::{web, HttpResponse};
use projeta_core::AppContext;
use std::sync::Arc;

use crate::handlers::users::{create_user_from_request, CreateUserRequest};

/// POST /v1/api/auth/register
///
/// Same body and rules as POST /users, but without a session requirement.
pub async fn register_handler(
    ctx: web::Data<Arc<AppContext>>,
    body: web::Json<CreateUserRequest>,
) -> HttpResponse {
    match create_user_from_request(&ctx, body.into_inner()).await {
        Ok(record) => HttpResponse::Created().json(record),
        Err(resp) => resp,
    }
}
