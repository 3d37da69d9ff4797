//! Current user handler
//!
//! GET /v1/api/auth/me - Returns the authenticated user's record

use actix_web::{web, HttpRequest, HttpResponse};
use projeta_core::AppContext;
use std::sync::Arc;

use crate::identity::require_session;
use crate::models::UserRecord;

/// GET /v1/api/auth/me
///
/// The record is re-read from storage during authentication, so role and
/// name changes show up here immediately, not at next token refresh.
pub async fn me_handler(req: HttpRequest, ctx: web::Data<Arc<AppContext>>) -> HttpResponse {
    let session = match require_session(&req, &ctx).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(UserRecord::from_user(&session.user))
}
