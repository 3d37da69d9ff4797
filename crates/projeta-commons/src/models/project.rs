//! Project entity for the projects table.

use serde::{Deserialize, Serialize};

use crate::ids::{ProjectId, UserId};
use crate::models::status::ProjectStatus;
use crate::serialization::Storable;

/// Project entity for the projects table.
///
/// Projects are hard-deleted (no `deleted_at` column). The membership roster
/// for a project lives in the project_members table and is only ever written
/// through the membership engine.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    /// The manager accountable for this project. The membership engine keeps
    /// this user pinned to the maintainer role on the roster.
    pub manager_id: UserId,
    /// Optional schedule bounds, Unix timestamps in milliseconds
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Storable for Project {}
