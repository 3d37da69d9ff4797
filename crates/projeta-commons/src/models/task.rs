//! Task entity for the tasks table.

use serde::{Deserialize, Serialize};

use crate::ids::{ProjectId, TaskId, UserId};
use crate::models::status::{TaskPriority, TaskStatus};
use crate::serialization::Storable;

/// Task entity for the tasks table.
///
/// Tasks are soft-deleted: `deleted_at` is set and list/lookup paths filter
/// deleted rows out.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Optional deadline, Unix timestamp in milliseconds
    pub due_date: Option<i64>,
    pub project_id: ProjectId,
    pub assignee_id: UserId,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl Task {
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn mark_deleted(&mut self) {
        let now = chrono::Utc::now().timestamp_millis();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

impl Storable for Task {}
