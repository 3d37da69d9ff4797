//! Project membership entity for the project_members table.

use serde::{Deserialize, Serialize};

use crate::ids::{MemberId, ProjectId, UserId};
use crate::models::roles::MemberRole;
use crate::serialization::Storable;

/// One membership row: a user's role within one project.
///
/// The pair (project_id, user_id) is unique across live rows. Rows are hard
/// deleted on removal; re-adding the same user yields a fresh `MemberId`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProjectMember {
    pub id: MemberId,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Storable for ProjectMember {}
