//! Project roster handlers.
//!
//! All four endpoints delegate to the membership engine. Handlers only
//! resolve the session and translate the wire shapes; every rule about who
//! may change what lives behind the engine's calls.
//!
//! ## Endpoints
//! - GET /v1/api/projects/{id}/members - Roster, maintainers first
//! - POST /v1/api/projects/{id}/members - Add a member
//! - PATCH /v1/api/projects/{id}/members/{userId} - Change a member's role
//! - DELETE /v1/api/projects/{id}/members/{userId} - Remove a member

use actix_web::{web, HttpRequest, HttpResponse};
use projeta_commons::{MemberRole, ProjectId, UserId};
use projeta_core::{AppContext, CoreError};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::map_core_error_to_response;
use crate::identity::require_session;
use crate::models::MemberRecord;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: i64,
    /// One of "viewer", "contributor", "maintainer"
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: String,
}

fn parse_role(value: &str) -> Result<MemberRole, HttpResponse> {
    MemberRole::from_str_opt(value).ok_or_else(|| {
        map_core_error_to_response(CoreError::InvalidState(format!(
            "Invalid member role: {}",
            value
        )))
    })
}

/// GET /v1/api/projects/{id}/members
///
/// Any valid session may read a roster; write authorization is decided
/// per-mutation by the engine.
pub async fn list_members_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let project_id = ProjectId::new(path.into_inner());
    match ctx.membership().list_members_async(project_id).await {
        Ok(roster) => {
            let records: Vec<MemberRecord> =
                roster.iter().map(MemberRecord::from_entry).collect();
            HttpResponse::Ok().json(records)
        }
        Err(e) => map_core_error_to_response(e),
    }
}

/// POST /v1/api/projects/{id}/members
pub async fn add_member_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
    body: web::Json<AddMemberRequest>,
) -> HttpResponse {
    let session = match require_session(&req, &ctx).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let role = match parse_role(&body.role) {
        Ok(role) => role,
        Err(resp) => return resp,
    };

    let project_id = ProjectId::new(path.into_inner());
    let user_id = UserId::new(body.user_id);

    match ctx
        .membership()
        .add_member_async(session.context(), project_id, user_id, role)
        .await
    {
        Ok(member) => HttpResponse::Created().json(MemberRecord::from_member(&member)),
        Err(e) => map_core_error_to_response(e),
    }
}

/// PATCH /v1/api/projects/{id}/members/{userId}
pub async fn update_member_role_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<(i64, i64)>,
    body: web::Json<UpdateMemberRoleRequest>,
) -> HttpResponse {
    let session = match require_session(&req, &ctx).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let role = match parse_role(&body.role) {
        Ok(role) => role,
        Err(resp) => return resp,
    };

    let (project_raw, user_raw) = path.into_inner();
    match ctx
        .membership()
        .update_member_role_async(
            session.context(),
            ProjectId::new(project_raw),
            UserId::new(user_raw),
            role,
        )
        .await
    {
        Ok(member) => HttpResponse::Ok().json(MemberRecord::from_member(&member)),
        Err(e) => map_core_error_to_response(e),
    }
}

/// DELETE /v1/api/projects/{id}/members/{userId}
pub async fn remove_member_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<(i64, i64)>,
) -> HttpResponse {
    let session = match require_session(&req, &ctx).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let (project_raw, user_raw) = path.into_inner();
    match ctx
        .membership()
        .remove_member_async(
            session.context(),
            ProjectId::new(project_raw),
            UserId::new(user_raw),
        )
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => map_core_error_to_response(e),
    }
}
