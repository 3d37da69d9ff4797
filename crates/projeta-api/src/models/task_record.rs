//! Task response record.

use super::millis_to_rfc3339;
use projeta_commons::models::Task;
use projeta_commons::{ProjectId, TaskId, TaskPriority, TaskStatus, UserId};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<String>,
    pub project_id: ProjectId,
    pub assignee_id: UserId,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskRecord {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date.map(millis_to_rfc3339),
            project_id: task.project_id,
            assignee_id: task.assignee_id,
            created_at: millis_to_rfc3339(task.created_at),
            updated_at: millis_to_rfc3339(task.updated_at),
        }
    }
}
