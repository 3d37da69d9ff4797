//! Roster entry response record.

use super::user_record::UserSummary;
use projeta_commons::models::ProjectMember;
use projeta_commons::{MemberId, MemberRole, ProjectId, UserId};
use projeta_core::RosterEntry;
use serde::Serialize;

/// One roster row on the wire.
///
/// `user` is embedded in listings; it is `None` when the member's account
/// has been deactivated, and omitted from the JSON entirely.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: MemberId,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role: MemberRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl MemberRecord {
    /// Bare record without the user embed, for mutation responses.
    pub fn from_member(member: &ProjectMember) -> Self {
        Self {
            id: member.id,
            project_id: member.project_id,
            user_id: member.user_id,
            role: member.role,
            user: None,
        }
    }

    pub fn from_entry(entry: &RosterEntry) -> Self {
        Self {
            id: entry.member.id,
            project_id: entry.member.project_id,
            user_id: entry.member.user_id,
            role: entry.member.role,
            user: entry.user.as_ref().map(UserSummary::from_user),
        }
    }
}
