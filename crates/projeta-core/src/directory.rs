//! Provider-backed implementation of the auth crate's user lookup.

use crate::providers::users::UsersProvider;
use projeta_auth::error::{AuthError, AuthResult};
use projeta_auth::UserDirectory;
use projeta_commons::{User, UserId};
use std::sync::Arc;

/// Resolves authenticated principals against the users table.
///
/// Lookups run on a blocking thread; the store itself is synchronous.
/// Soft-deleted users are returned as stored so the authentication layer
/// can reject them with its own error.
pub struct ProviderUserDirectory {
    users: Arc<UsersProvider>,
}

impl ProviderUserDirectory {
    pub fn new(users: Arc<UsersProvider>) -> Self {
        Self { users }
    }
}

impl std::fmt::Debug for ProviderUserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderUserDirectory").finish()
    }
}

#[async_trait::async_trait]
impl UserDirectory for ProviderUserDirectory {
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let users = self.users.clone();
        tokio::task::spawn_blocking(move || users.get_user_by_id(&user_id))
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Task join error: {}", e)))?
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projeta_commons::{GlobalRole, StorageBackend};
    use projeta_store::test_utils::InMemoryBackend;

    fn create_test_directory() -> (ProviderUserDirectory, Arc<UsersProvider>) {
        let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
        let users = Arc::new(UsersProvider::new(backend));
        (ProviderUserDirectory::new(users.clone()), users)
    }

    fn test_user(id: i64) -> User {
        User {
            id: UserId::new(id),
            name: "Directory User".to_string(),
            email: format!("dir{}@example.com", id),
            password_hash: "hashed_password".to_string(),
            role: GlobalRole::Developer,
            created_at: 1000,
            updated_at: 1000,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_resolves_user() {
        let (directory, users) = create_test_directory();
        users.create_user(test_user(1)).unwrap();

        let found = directory.find_by_id(UserId::new(1)).await.unwrap();
        assert_eq!(found.map(|u| u.email), Some("dir1@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_find_by_id_unknown_user_is_none() {
        let (directory, _) = create_test_directory();
        assert!(directory.find_by_id(UserId::new(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_returns_deleted_user_as_stored() {
        let (directory, users) = create_test_directory();
        users.create_user(test_user(2)).unwrap();
        users.delete_user(&UserId::new(2)).unwrap();

        // The raw record comes back; rejecting deactivated accounts is the
        // authentication layer's decision
        let found = directory.find_by_id(UserId::new(2)).await.unwrap();
        assert!(found.is_some());
        assert!(found.map(|u| u.is_deleted()).unwrap_or(false));
    }
}
