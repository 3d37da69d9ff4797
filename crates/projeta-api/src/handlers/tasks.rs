//! Task handlers.
//!
//! ## Endpoints
//! - GET /v1/api/tasks?projectId=&status=&priority=&q= - List with filters
//! - POST /v1/api/tasks - Create a task (assignee = caller)
//! - GET /v1/api/tasks/{id} - Fetch one task
//! - PATCH /v1/api/tasks/{id} - Update fields
//! - DELETE /v1/api/tasks/{id} - Soft delete

use actix_web::{web, HttpRequest, HttpResponse};
use projeta_commons::models::Task;
use projeta_commons::{ProjectId, TaskId, TaskPriority, TaskStatus};
use projeta_core::{AppContext, CoreError, TaskFilter};
use serde::Deserialize;
use std::sync::Arc;

use super::run_blocking;
use crate::error::map_core_error_to_response;
use crate::identity::require_session;
use crate::models::TaskRecord;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    /// One of "todo", "in_progress", "review", "done"
    pub status: String,
    /// One of "low", "medium", "high", "critical"
    pub priority: String,
    pub due_date: Option<String>,
    pub project_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub project_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksQuery {
    pub project_id: Option<i64>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub q: Option<String>,
}

fn invalid_state(message: String) -> HttpResponse {
    map_core_error_to_response(CoreError::InvalidState(message))
}

fn parse_status(value: &str) -> Result<TaskStatus, HttpResponse> {
    TaskStatus::from_str_opt(value)
        .ok_or_else(|| invalid_state(format!("Invalid task status: {}", value)))
}

fn parse_priority(value: &str) -> Result<TaskPriority, HttpResponse> {
    TaskPriority::from_str_opt(value)
        .ok_or_else(|| invalid_state(format!("Invalid task priority: {}", value)))
}

fn parse_due_date(value: &str) -> Result<i64, HttpResponse> {
    crate::models::parse_date_millis(value)
        .ok_or_else(|| invalid_state(format!("Invalid date: {}", value)))
}

fn project_not_found(project_id: ProjectId) -> HttpResponse {
    map_core_error_to_response(CoreError::NotFound(format!(
        "Project not found: {}",
        project_id
    )))
}

/// GET /v1/api/tasks
pub async fn list_tasks_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<TasksQuery>,
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
    let priority = match query.priority.as_deref() {
        Some(value) => match parse_priority(value) {
            Ok(priority) => Some(priority),
            Err(resp) => return resp,
        },
        None => None,
    };

    let filter = TaskFilter {
        project_id: query.project_id.map(ProjectId::new),
        status,
        priority,
        q: query.q.clone(),
    };

    let tasks = ctx.tasks();
    match run_blocking(move || tasks.list_tasks(&filter)).await {
        Ok(list) => {
            let records: Vec<TaskRecord> = list.iter().map(TaskRecord::from_task).collect();
            HttpResponse::Ok().json(records)
        }
        Err(e) => map_core_error_to_response(e),
    }
}

/// POST /v1/api/tasks
///
/// The referenced project must exist; the authenticated caller becomes the
/// assignee.
pub async fn create_task_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    body: web::Json<CreateTaskRequest>,
) -> HttpResponse {
    let session = match require_session(&req, &ctx).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let payload = body.into_inner();
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return invalid_state("Title must not be empty".to_string());
    }

    let status = match parse_status(&payload.status) {
        Ok(status) => status,
        Err(resp) => return resp,
    };
    let priority = match parse_priority(&payload.priority) {
        Ok(priority) => priority,
        Err(resp) => return resp,
    };
    let due_date = match payload.due_date.as_deref().map(parse_due_date).transpose() {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let project_id = ProjectId::new(payload.project_id);
    match ctx.projects().project_exists(&project_id) {
        Ok(true) => {}
        Ok(false) => return project_not_found(project_id),
        Err(e) => return map_core_error_to_response(e),
    }

    let id = match ctx.next_task_id() {
        Ok(id) => id,
        Err(e) => return map_core_error_to_response(e),
    };

    let now = chrono::Utc::now().timestamp_millis();
    let task = Task {
        id,
        title,
        description: payload.description,
        status,
        priority,
        due_date,
        project_id,
        assignee_id: session.user.id,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };

    if let Err(e) = ctx.tasks().create_task(task.clone()) {
        return map_core_error_to_response(e);
    }

    log::info!(
        "User {} created task {} in project {}",
        session.user.id,
        id,
        project_id
    );
    HttpResponse::Created().json(TaskRecord::from_task(&task))
}

/// GET /v1/api/tasks/{id}
pub async fn get_task_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let task_id = TaskId::new(path.into_inner());
    match ctx.tasks().get_active_task(&task_id) {
        Ok(Some(task)) => HttpResponse::Ok().json(TaskRecord::from_task(&task)),
        Ok(None) => map_core_error_to_response(CoreError::NotFound(format!(
            "Task not found: {}",
            task_id
        ))),
        Err(e) => map_core_error_to_response(e),
    }
}

/// PATCH /v1/api/tasks/{id}
pub async fn update_task_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
    body: web::Json<UpdateTaskRequest>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let task_id = TaskId::new(path.into_inner());
    let mut task = match ctx.tasks().get_active_task(&task_id) {
        Ok(Some(task)) => task,
        Ok(None) => {
            return map_core_error_to_response(CoreError::NotFound(format!(
                "Task not found: {}",
                task_id
            )))
        }
        Err(e) => return map_core_error_to_response(e),
    };

    let patch = body.into_inner();

    if let Some(title) = patch.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return invalid_state("Title must not be empty".to_string());
        }
        task.title = title;
    }
    if let Some(description) = patch.description {
        task.description = Some(description);
    }
    if let Some(status_str) = patch.status {
        task.status = match parse_status(&status_str) {
            Ok(status) => status,
            Err(resp) => return resp,
        };
    }
    if let Some(priority_str) = patch.priority {
        task.priority = match parse_priority(&priority_str) {
            Ok(priority) => priority,
            Err(resp) => return resp,
        };
    }
    if let Some(value) = patch.due_date.as_deref() {
        task.due_date = match parse_due_date(value) {
            Ok(millis) => Some(millis),
            Err(resp) => return resp,
        };
    }
    if let Some(raw_id) = patch.project_id {
        let project_id = ProjectId::new(raw_id);
        match ctx.projects().project_exists(&project_id) {
            Ok(true) => task.project_id = project_id,
            Ok(false) => return project_not_found(project_id),
            Err(e) => return map_core_error_to_response(e),
        }
    }

    task.updated_at = chrono::Utc::now().timestamp_millis();

    match ctx.tasks().update_task(task.clone()) {
        Ok(()) => HttpResponse::Ok().json(TaskRecord::from_task(&task)),
        Err(e) => map_core_error_to_response(e),
    }
}

/// DELETE /v1/api/tasks/{id}
pub async fn delete_task_handler(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(resp) = require_session(&req, &ctx).await {
        return resp;
    }

    let task_id = TaskId::new(path.into_inner());
    match ctx.tasks().delete_task(&task_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => map_core_error_to_response(e),
    }
}
