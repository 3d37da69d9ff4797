//! Central registry of shared service resources.
//!
//! One `AppContext` is built at startup and handed to the HTTP layer as
//! shared data. It wires the storage backend into the providers, the
//! providers into the membership engine, and exposes the pieces request
//! handlers need.
//!
//! The members table has no accessor here on purpose: roster rows are only
//! reachable through the membership engine, so its rules cannot be bypassed
//! by a handler reaching for the raw table.

use crate::directory::ProviderUserDirectory;
use crate::error::{CoreError, CoreResult};
use crate::membership_engine::MembershipEngine;
use crate::providers::members::MembersProvider;
use crate::providers::projects::ProjectsProvider;
use crate::providers::tasks::TasksProvider;
use crate::providers::users::UsersProvider;
use projeta_auth::UserDirectory;
use projeta_commons::{ProjectId, SnowflakeGenerator, StorageBackend, TaskId, UserId};
use projeta_store::ProjectLocks;
use std::sync::Arc;
use std::time::Duration;

/// Token signing and validation settings, taken from configuration.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Issuers accepted during token validation
    pub trusted_issuers: Vec<String>,
    /// Access token lifetime in minutes
    pub token_ttl_minutes: i64,
}

/// Shared resources for the running service.
pub struct AppContext {
    users: Arc<UsersProvider>,
    projects: Arc<ProjectsProvider>,
    tasks: Arc<TasksProvider>,
    membership: MembershipEngine,
    ids: Arc<SnowflakeGenerator>,
    user_directory: Arc<dyn UserDirectory>,
    auth: AuthSettings,
}

impl AppContext {
    /// Wire up all providers and the membership engine over `backend`.
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        auth: AuthSettings,
        lock_timeout: Duration,
        worker_id: u16,
    ) -> Self {
        let users = Arc::new(UsersProvider::new(backend.clone()));
        let projects = Arc::new(ProjectsProvider::new(backend.clone()));
        let tasks = Arc::new(TasksProvider::new(backend.clone()));
        let members = Arc::new(MembersProvider::new(backend.clone()));
        let locks = Arc::new(ProjectLocks::new(lock_timeout));
        let ids = Arc::new(SnowflakeGenerator::new(worker_id));

        let membership =
            MembershipEngine::new(users.clone(), projects.clone(), members, locks, ids.clone());

        let user_directory: Arc<dyn UserDirectory> =
            Arc::new(ProviderUserDirectory::new(users.clone()));

        Self {
            users,
            projects,
            tasks,
            membership,
            ids,
            user_directory,
            auth,
        }
    }

    /// Context over an in-memory backend for tests.
    #[cfg(test)]
    pub fn new_test() -> Self {
        use projeta_store::test_utils::InMemoryBackend;

        Self::new(
            Arc::new(InMemoryBackend::new()),
            AuthSettings {
                jwt_secret: "test-secret".to_string(),
                trusted_issuers: vec![projeta_auth::jwt::PROJETA_ISSUER.to_string()],
                token_ttl_minutes: 15,
            },
            Duration::from_millis(500),
            0,
        )
    }

    pub fn users(&self) -> Arc<UsersProvider> {
        self.users.clone()
    }

    pub fn projects(&self) -> Arc<ProjectsProvider> {
        self.projects.clone()
    }

    pub fn tasks(&self) -> Arc<TasksProvider> {
        self.tasks.clone()
    }

    pub fn membership(&self) -> &MembershipEngine {
        &self.membership
    }

    pub fn user_directory(&self) -> &Arc<dyn UserDirectory> {
        &self.user_directory
    }

    pub fn auth(&self) -> &AuthSettings {
        &self.auth
    }

    pub fn next_user_id(&self) -> CoreResult<UserId> {
        self.next_raw_id().map(UserId::new)
    }

    pub fn next_project_id(&self) -> CoreResult<ProjectId> {
        self.next_raw_id().map(ProjectId::new)
    }

    pub fn next_task_id(&self) -> CoreResult<TaskId> {
        self.next_raw_id().map(TaskId::new)
    }

    fn next_raw_id(&self) -> CoreResult<i64> {
        self.ids.next_id().map_err(CoreError::Internal)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projeta_commons::models::User;
    use projeta_commons::{CallerContext, GlobalRole, MemberRole};

    #[test]
    fn test_context_wires_shared_providers() {
        let ctx = AppContext::new_test();

        let id = ctx.next_user_id().unwrap();
        let user = User {
            id,
            name: "Wire Check".to_string(),
            email: "wire@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            role: GlobalRole::Admin,
            created_at: 1000,
            updated_at: 1000,
            deleted_at: None,
        };
        ctx.users().create_user(user).unwrap();

        // The engine sees the same users table the accessor exposes
        let project_id = ctx.next_project_id().unwrap();
        ctx.projects()
            .create_project(projeta_commons::models::Project {
                id: project_id,
                name: "Wire Project".to_string(),
                description: String::new(),
                status: projeta_commons::ProjectStatus::Active,
                manager_id: id,
                start_date: None,
                end_date: None,
                created_at: 1000,
                updated_at: 1000,
            })
            .unwrap();

        let caller = CallerContext::authenticated(id, GlobalRole::Admin);
        ctx.membership()
            .add_member(&caller, project_id, id, MemberRole::Maintainer)
            .unwrap();

        let roster = ctx.membership().list_members(project_id).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(
            roster[0].user.as_ref().map(|u| u.email.as_str()),
            Some("wire@example.com")
        );
    }

    #[test]
    fn test_id_minting_is_monotonic() {
        let ctx = AppContext::new_test();
        let a = ctx.next_project_id().unwrap();
        let b = ctx.next_project_id().unwrap();
        assert!(b > a);
    }
}
