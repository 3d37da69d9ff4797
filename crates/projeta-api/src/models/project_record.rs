//! Project response record.

use super::user_record::UserSummary;
use super::millis_to_rfc3339;
use projeta_commons::models::{Project, User};
use projeta_commons::{ProjectId, ProjectStatus, UserId};
use serde::Serialize;

/// Project record with an embedded manager summary.
///
/// `manager` is `None` when the manager's account has been deactivated;
/// `manager_id` still identifies the row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub manager_id: UserId,
    pub manager: Option<UserSummary>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectRecord {
    pub fn from_project(project: &Project, manager: Option<&User>) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            manager_id: project.manager_id,
            manager: manager.map(UserSummary::from_user),
            start_date: project.start_date.map(millis_to_rfc3339),
            end_date: project.end_date.map(millis_to_rfc3339),
            created_at: millis_to_rfc3339(project.created_at),
            updated_at: millis_to_rfc3339(project.updated_at),
        }
    }
}
