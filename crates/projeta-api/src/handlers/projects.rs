//! Project handlers.
//!
//! ## Endpoints
//! - GET /v1/api/projects?status=&q= - List projects
//! - POST /v1/api/projects - Create a project (manager = caller)
//! - GET /v1/api/projects/{id} - Fetch one project
//! - PATCH /v1/api/projects/{id} - Update fields, including the manager
//! - DELETE /v1/api/projects/{id} - Hard delete, admins and managers only

use actix_web::{web, HttpRequest, HttpResponse};
use projeta_commons::models::Project;
use projeta_commons::{ProjectId, ProjectStatus, UserId};
use projeta_core::{AppContext, CoreError};
use serde::Deserialize;
use std::sync::Arc;

use super::run_blocking;
use crate::error::map_core_error_to_response;
use crate::identity::require_session;
use crate::models::ProjectRecord;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    /// One of "planned", "active", "completed", "cancelled"
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Reassigns the project manager; the new manager must be an existing
    /// active user
    pub manager_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsQuery {
    pub status: Option<String>,
    pub q: Option<String>,
}

fn invalid_state(message: String) -> HttpResponse {
    map_core_error_to_response(CoreError::InvalidState(message))
}

fn parse_status(value: &str) -> Result<ProjectStatus, HttpResponse> {
    ProjectStatus::from_str_opt(value)
        .ok_or_else(|| invalid_state(format!("Invalid project status: {}", value)))
}

fn parse_date(value: &str) -> Result<i64, HttpResponse> {
    crate::models::parse_date_millis(value)
        .ok_or_else(|| invalid_state(format!("Invalid date: {}", value)))
}

/// GET /v1/api/projects
pub async fn list_projects_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<ProjectsQuery>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let status = match query.status.as_deref() {
        Some(value) => match parse_status(value) {
            Ok(status) => Some(status),
            Err(resp) => return resp,
        },
        None => None,
    };

    let projects = ctx.projects();
    let q = query.q.clone();
    let list = match run_blocking(move || projects.list_projects(status, q.as_deref())).await {
        Ok(list) => list,
        Err(e) => return map_core_error_to_response(e),
    };

    let mut records = Vec::with_capacity(list.len());
    for project in &list {
        let manager = match ctx.users().get_active_user(&project.manager_id) {
            Ok(manager) => manager,
            Err(e) => return map_core_error_to_response(e),
        };
        records.push(ProjectRecord::from_project(project, manager.as_ref()));
    }

    HttpResponse::Ok().json(records)
}

/// POST /v1/api/projects
///
/// The authenticated caller becomes the project manager. No roster row is
/// created here; membership is granted separately through the members API.
pub async fn create_project_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    body: web::Json<CreateProjectRequest>,
) -> HttpResponse {
    let session = match require_session(&req, &ctx).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let payload = body.into_inner();
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return invalid_state("Name must not be empty".to_string());
    }

    let status = match parse_status(&payload.status) {
        Ok(status) => status,
        Err(resp) => return resp,
    };

    let start_date = match payload.start_date.as_deref().map(parse_date).transpose() {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let end_date = match payload.end_date.as_deref().map(parse_date).transpose() {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let id = match ctx.next_project_id() {
        Ok(id) => id,
        Err(e) => return map_core_error_to_response(e),
    };

    let now = chrono::Utc::now().timestamp_millis();
    let project = Project {
        id,
        name,
        description: payload.description.unwrap_or_default(),
        status,
        manager_id: session.user.id,
        start_date,
        end_date,
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = ctx.projects().create_project(project.clone()) {
        return map_core_error_to_response(e);
    }

    log::info!("User {} created project {}", session.user.id, id);

    HttpResponse::Created().json(ProjectRecord::from_project(&project, Some(&session.user)))
}

/// GET /v1/api/projects/{id}
pub async fn get_project_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let project_id = ProjectId::new(path.into_inner());
    let project = match ctx.projects().get_project(&project_id) {
        Ok(Some(project)) => project,
        Ok(None) => {
            return map_core_error_to_response(CoreError::NotFound(format!(
                "Project not found: {}",
                project_id
            )))
        }
        Err(e) => return map_core_error_to_response(e),
    };

    let manager = match ctx.users().get_active_user(&project.manager_id) {
        Ok(manager) => manager,
        Err(e) => return map_core_error_to_response(e),
    };
    HttpResponse::Ok().json(ProjectRecord::from_project(&project, manager.as_ref()))
}

/// PATCH /v1/api/projects/{id}
///
/// `managerId` reassignment is validated against the users table. The
/// membership engine keeps treating whoever this field names as pinned to
/// the maintainer role.
pub async fn update_project_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
    body: web::Json<UpdateProjectRequest>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let project_id = ProjectId::new(path.into_inner());
    let mut project = match ctx.projects().get_project(&project_id) {
        Ok(Some(project)) => project,
        Ok(None) => {
            return map_core_error_to_response(CoreError::NotFound(format!(
                "Project not found: {}",
                project_id
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
        project.name = name;
    }
    if let Some(description) = patch.description {
        project.description = description;
    }
    if let Some(status_str) = patch.status {
        project.status = match parse_status(&status_str) {
            Ok(status) => status,
            Err(resp) => return resp,
        };
    }
    if let Some(value) = patch.start_date.as_deref() {
        project.start_date = match parse_date(value) {
            Ok(millis) => Some(millis),
            Err(resp) => return resp,
        };
    }
    if let Some(value) = patch.end_date.as_deref() {
        project.end_date = match parse_date(value) {
            Ok(millis) => Some(millis),
            Err(resp) => return resp,
        };
    }
    if let Some(raw_id) = patch.manager_id {
        let new_manager = UserId::new(raw_id);
        match ctx.users().get_active_user(&new_manager) {
            Ok(Some(_)) => project.manager_id = new_manager,
            Ok(None) => {
                return map_core_error_to_response(CoreError::NotFound(format!(
                    "User not found: {}",
                    new_manager
                )))
            }
            Err(e) => return map_core_error_to_response(e),
        }
    }

    project.updated_at = chrono::Utc::now().timestamp_millis();

    if let Err(e) = ctx.projects().update_project(project.clone()) {
        return map_core_error_to_response(e);
    }

    let manager = match ctx.users().get_active_user(&project.manager_id) {
        Ok(manager) => manager,
        Err(e) => return map_core_error_to_response(e),
    };
    HttpResponse::Ok().json(ProjectRecord::from_project(&project, manager.as_ref()))
}

/// DELETE /v1/api/projects/{id}
///
/// Hard delete, restricted to privileged global roles. Roster rows and
/// tasks are not cascaded; member listings for the gone project return 404.
pub async fn delete_project_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
) -> HttpResponse {
    let session = match require_session(&req, &ctx).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    if !session.user.role.is_privileged() {
        return map_core_error_to_response(CoreError::Forbidden(
            "Only admins or managers can delete projects".to_string(),
        ));
    }

    let project_id = ProjectId::new(path.into_inner());
    match ctx.projects().delete_project(&project_id) {
        Ok(()) => {
            log::info!("User {} deleted project {}", session.user.id, project_id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => map_core_error_to_response(e),
    }
}
