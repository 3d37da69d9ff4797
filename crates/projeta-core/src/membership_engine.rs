//! Membership engine: the single write path for project rosters.
//!
//! Every roster mutation runs through this engine, which enforces the
//! membership rules in a fixed order while holding the project's write lock:
//!
//! - a `(project, user)` pair holds at most one roster row;
//! - the project manager's roster row is pinned to the maintainer role;
//! - the last maintainer of a project can be neither demoted nor removed;
//! - only admins, global managers, or maintainers of the project itself may
//!   mutate its roster.
//!
//! Reads (`list_members`) are lock-free. Writes acquire the per-project lock
//! after the existence checks and keep it across guard evaluation and the
//! storage write, so concurrent mutations of one roster serialize and the
//! maintainer count can never be raced below one.

use crate::error::{CoreError, CoreResult};
use crate::providers::members::MembersProvider;
use crate::providers::projects::ProjectsProvider;
use crate::providers::users::UsersProvider;
use projeta_commons::models::{Project, ProjectMember, User};
use projeta_commons::{CallerContext, MemberId, MemberRole, ProjectId, SnowflakeGenerator, UserId};
use projeta_store::ProjectLocks;
use std::sync::Arc;

/// One roster row together with the member's user record, when that user
/// still resolves. Deactivated accounts keep their roster row but embed as
/// `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub member: ProjectMember,
    pub user: Option<User>,
}

/// Authorization and invariant engine for project membership.
///
/// Cheap to clone; all fields are shared handles.
#[derive(Clone)]
pub struct MembershipEngine {
    users: Arc<UsersProvider>,
    projects: Arc<ProjectsProvider>,
    members: Arc<MembersProvider>,
    locks: Arc<ProjectLocks>,
    ids: Arc<SnowflakeGenerator>,
}

impl std::fmt::Debug for MembershipEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipEngine").finish()
    }
}

impl MembershipEngine {
    pub fn new(
        users: Arc<UsersProvider>,
        projects: Arc<ProjectsProvider>,
        members: Arc<MembersProvider>,
        locks: Arc<ProjectLocks>,
        ids: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            users,
            projects,
            members,
            locks,
            ids,
        }
    }

    /// Add a user to a project's roster.
    ///
    /// Checks run in order: project exists, user exists, caller authorized,
    /// no existing row for the pair, manager-role pin. The duplicate check
    /// and the insert happen under the project's write lock.
    pub fn add_member(
        &self,
        caller: &CallerContext,
        project_id: ProjectId,
        user_id: UserId,
        role: MemberRole,
    ) -> CoreResult<ProjectMember> {
        let project = self.require_project(project_id)?;
        self.require_user(user_id)?;

        let _guard = self.locks.lock_project(project_id)?;

        self.authorize_member_management(caller, &project)?;

        if self.members.get_membership(&project_id, &user_id)?.is_some() {
            return Err(CoreError::Conflict(format!(
                "User {} is already a member of project {}",
                user_id, project_id
            )));
        }

        if user_id == project.manager_id && role != MemberRole::Maintainer {
            return Err(CoreError::InvalidState(
                "The project manager must hold the maintainer role".to_string(),
            ));
        }

        let now = chrono::Utc::now().timestamp_millis();
        let member = ProjectMember {
            id: self.next_member_id()?,
            project_id,
            user_id,
            role,
            created_at: now,
            updated_at: now,
        };

        self.members.insert_member(member.clone())?;

        log::info!(
            "Added user {} to project {} as {}",
            user_id,
            project_id,
            role
        );
        Ok(member)
    }

    /// Change the role on an existing roster row.
    ///
    /// Rejects demoting the project manager away from maintainer, and
    /// demoting the last maintainer. The maintainer count is taken before
    /// the write, under the project lock.
    pub fn update_member_role(
        &self,
        caller: &CallerContext,
        project_id: ProjectId,
        user_id: UserId,
        new_role: MemberRole,
    ) -> CoreResult<ProjectMember> {
        let project = self.require_project(project_id)?;
        self.require_user(user_id)?;

        let _guard = self.locks.lock_project(project_id)?;

        self.authorize_member_management(caller, &project)?;

        let mut member = self
            .members
            .get_membership(&project_id, &user_id)?
            .ok_or_else(|| {
                CoreError::NotFound(format!(
                    "User {} is not a member of project {}",
                    user_id, project_id
                ))
            })?;

        if user_id == project.manager_id && new_role != MemberRole::Maintainer {
            return Err(CoreError::InvalidState(
                "The project manager must hold the maintainer role".to_string(),
            ));
        }

        if member.role == MemberRole::Maintainer
            && new_role != MemberRole::Maintainer
            && self.members.count_project_maintainers(&project_id)? <= 1
        {
            return Err(CoreError::InvalidState(
                "Cannot demote the last maintainer of the project".to_string(),
            ));
        }

        member.role = new_role;
        member.updated_at = chrono::Utc::now().timestamp_millis();

        self.members.update_member(member.clone())?;

        log::info!(
            "Changed role of user {} on project {} to {}",
            user_id,
            project_id,
            new_role
        );
        Ok(member)
    }

    /// Remove a user from a project's roster (hard delete).
    ///
    /// The user record itself is not consulted: members whose accounts were
    /// deactivated can still be taken off the roster. The project manager
    /// and the last maintainer cannot be removed.
    pub fn remove_member(
        &self,
        caller: &CallerContext,
        project_id: ProjectId,
        user_id: UserId,
    ) -> CoreResult<()> {
        let project = self.require_project(project_id)?;

        let _guard = self.locks.lock_project(project_id)?;

        self.authorize_member_management(caller, &project)?;

        let member = self
            .members
            .get_membership(&project_id, &user_id)?
            .ok_or_else(|| {
                CoreError::NotFound(format!(
                    "User {} is not a member of project {}",
                    user_id, project_id
                ))
            })?;

        if user_id == project.manager_id {
            return Err(CoreError::InvalidState(
                "The project manager cannot be removed; change the project manager first"
                    .to_string(),
            ));
        }

        if member.role == MemberRole::Maintainer
            && self.members.count_project_maintainers(&project_id)? <= 1
        {
            return Err(CoreError::InvalidState(
                "Cannot remove the last maintainer of the project".to_string(),
            ));
        }

        self.members.delete_member(&member)?;

        log::info!("Removed user {} from project {}", user_id, project_id);
        Ok(())
    }

    /// List a project's roster, maintainers first, then contributors, then
    /// viewers; ties break by row id ascending (insertion order).
    ///
    /// Each entry embeds the member's user record; rows whose account has
    /// been deactivated embed `None`.
    pub fn list_members(&self, project_id: ProjectId) -> CoreResult<Vec<RosterEntry>> {
        self.require_project(project_id)?;

        let mut rows = self.members.list_project_members(&project_id)?;
        rows.sort_by(|a, b| {
            a.role
                .sort_rank()
                .cmp(&b.role.sort_rank())
                .then(a.id.cmp(&b.id))
        });

        let mut roster = Vec::with_capacity(rows.len());
        for member in rows {
            let user = self.users.get_active_user(&member.user_id)?;
            roster.push(RosterEntry { member, user });
        }

        Ok(roster)
    }

    /// Decide whether `caller` may mutate the roster of `project`.
    ///
    /// Allowed when the caller is authenticated AND either holds a
    /// privileged global role (admin or manager) or holds a maintainer row
    /// on this very project. Unauthenticated callers are rejected before
    /// any roster fact is consulted.
    fn authorize_member_management(
        &self,
        caller: &CallerContext,
        project: &Project,
    ) -> CoreResult<()> {
        let caller_id = caller.caller_id.ok_or_else(|| {
            CoreError::Forbidden("Authentication is required to manage project members".to_string())
        })?;

        if caller.global_role.is_privileged() {
            return Ok(());
        }

        let own_row = self.members.get_membership(&project.id, &caller_id)?;
        if own_row.map_or(false, |m| m.role == MemberRole::Maintainer) {
            return Ok(());
        }

        Err(CoreError::Forbidden(
            "Only admins, managers, or maintainers of this project can manage its members"
                .to_string(),
        ))
    }

    fn require_project(&self, project_id: ProjectId) -> CoreResult<Project> {
        self.projects
            .get_project(&project_id)?
            .ok_or_else(|| CoreError::NotFound(format!("Project not found: {}", project_id)))
    }

    fn require_user(&self, user_id: UserId) -> CoreResult<User> {
        self.users
            .get_active_user(&user_id)?
            .ok_or_else(|| CoreError::NotFound(format!("User not found: {}", user_id)))
    }

    fn next_member_id(&self) -> CoreResult<MemberId> {
        self.ids
            .next_id()
            .map(MemberId::new)
            .map_err(CoreError::Internal)
    }

    // ========================================================================
    // Async wrappers
    // ========================================================================

    /// Async version of `add_member()`.
    ///
    /// Runs the whole operation, lock included, on a blocking thread.
    pub async fn add_member_async(
        &self,
        caller: CallerContext,
        project_id: ProjectId,
        user_id: UserId,
        role: MemberRole,
    ) -> CoreResult<ProjectMember> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.add_member(&caller, project_id, user_id, role))
            .await
            .map_err(|e| CoreError::Internal(format!("spawn_blocking error: {}", e)))?
    }

    /// Async version of `update_member_role()`.
    pub async fn update_member_role_async(
        &self,
        caller: CallerContext,
        project_id: ProjectId,
        user_id: UserId,
        new_role: MemberRole,
    ) -> CoreResult<ProjectMember> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || {
            engine.update_member_role(&caller, project_id, user_id, new_role)
        })
        .await
        .map_err(|e| CoreError::Internal(format!("spawn_blocking error: {}", e)))?
    }

    /// Async version of `remove_member()`.
    pub async fn remove_member_async(
        &self,
        caller: CallerContext,
        project_id: ProjectId,
        user_id: UserId,
    ) -> CoreResult<()> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.remove_member(&caller, project_id, user_id))
            .await
            .map_err(|e| CoreError::Internal(format!("spawn_blocking error: {}", e)))?
    }

    /// Async version of `list_members()`.
    pub async fn list_members_async(&self, project_id: ProjectId) -> CoreResult<Vec<RosterEntry>> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.list_members(project_id))
            .await
            .map_err(|e| CoreError::Internal(format!("spawn_blocking error: {}", e)))?
    }
}
