//! Users table provider.
//!
//! Accounts are soft-deleted: `deleted_at` is set and the account stops
//! resolving through lookups, lists, and the email index. The raw row is
//! kept so historical references (task assignees, roster rows) stay
//! explainable.
//!
//! ## Indexes
//!
//! 1. **UserEmailIndex** - Unique email lookup (case-insensitive)
//!    - Key: `{email_lowercase}`
//!    - Enables: "Get user by email" (login) and email uniqueness checks

use super::users_indexes::create_users_indexes;
use crate::error::{CoreError, CoreResult, CoreResultExt};
use projeta_commons::models::User;
use projeta_commons::{DomainTable, IndexPartition, StorageBackend, UserId};
use projeta_store::entity_store::EntityStore;
use projeta_store::IndexedEntityStore;
use std::sync::Arc;

/// Type alias for the indexed users store
pub type UsersStore = IndexedEntityStore<UserId, User>;

/// Default number of rows returned by `search_users` when no limit is given.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Upper bound for `search_users` limits; larger requests are clamped.
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Users table provider using `IndexedEntityStore` for automatic index
/// management.
pub struct UsersProvider {
    store: UsersStore,
}

impl std::fmt::Debug for UsersProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsersProvider").finish()
    }
}

impl UsersProvider {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        let store = IndexedEntityStore::new(
            backend,
            DomainTable::Users.partition(),
            create_users_indexes(),
        );
        Self { store }
    }

    fn email_index_idx(&self) -> CoreResult<usize> {
        self.store
            .find_index_by_partition(IndexPartition::UsersEmailIdx.partition())
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Missing expected index partition: {}",
                    IndexPartition::UsersEmailIdx.name()
                ))
            })
    }

    /// Create a new user.
    ///
    /// Rejects the insert with `Conflict` when another live account already
    /// holds the email (case-insensitive).
    pub fn create_user(&self, user: User) -> CoreResult<()> {
        let email_idx = self.email_index_idx()?;
        let email_key = user.email.to_lowercase();

        let existing = self
            .store
            .get_by_index_exact(email_idx, email_key.as_bytes())
            .into_core_error("email index lookup error")?;
        if existing.is_some() {
            return Err(CoreError::Conflict(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }

        self.store
            .insert(&user.id, &user)
            .into_core_error("insert user error")
    }

    /// Update an existing user.
    ///
    /// Returns `NotFound` for missing or deactivated accounts and `Conflict`
    /// when an email change collides with another live account.
    pub fn update_user(&self, user: User) -> CoreResult<()> {
        let existing = self
            .store
            .get(&user.id)?
            .filter(|u| !u.is_deleted())
            .ok_or_else(|| CoreError::NotFound(format!("User not found: {}", user.id)))?;

        if !existing.email.eq_ignore_ascii_case(&user.email) {
            let email_idx = self.email_index_idx()?;
            let email_key = user.email.to_lowercase();

            let owner = self
                .store
                .get_by_index_exact(email_idx, email_key.as_bytes())
                .into_core_error("email index lookup error")?;
            if let Some(owner_id) = owner {
                if owner_id != user.id {
                    return Err(CoreError::Conflict(format!(
                        "User with email '{}' already exists",
                        user.email
                    )));
                }
            }
        }

        self.store
            .update_with_old(&user.id, Some(&existing), &user)
            .into_core_error("update user error")
    }

    /// Soft delete a user (sets `deleted_at`).
    ///
    /// The email index entry is dropped with the update, freeing the address
    /// for new registrations.
    pub fn delete_user(&self, user_id: &UserId) -> CoreResult<()> {
        let mut user = self
            .store
            .get(user_id)?
            .filter(|u| !u.is_deleted())
            .ok_or_else(|| CoreError::NotFound(format!("User not found: {}", user_id)))?;

        user.mark_deleted();

        self.store
            .update(user_id, &user)
            .into_core_error("delete user error")
    }

    /// Get a user row by ID, including soft-deleted rows.
    ///
    /// The authentication layer needs the raw row to distinguish "unknown
    /// user" from "deactivated account". Everything else should use
    /// `get_active_user`.
    pub fn get_user_by_id(&self, user_id: &UserId) -> CoreResult<Option<User>> {
        Ok(self.store.get(user_id)?)
    }

    /// Get a live user by ID; soft-deleted accounts resolve to `None`.
    pub fn get_active_user(&self, user_id: &UserId) -> CoreResult<Option<User>> {
        Ok(self.store.get(user_id)?.filter(|u| !u.is_deleted()))
    }

    /// Get a live user by email (case-insensitive, exact match).
    pub fn get_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let email_idx = self.email_index_idx()?;
        let email_key = email.to_lowercase();

        let user_id = self
            .store
            .get_by_index_exact(email_idx, email_key.as_bytes())
            .into_core_error("email index lookup error")?;

        match user_id {
            Some(id) => Ok(self.store.get(&id)?.filter(|u| !u.is_deleted())),
            None => Ok(None),
        }
    }

    /// List all live users ordered by name, ties by id.
    pub fn list_users(&self) -> CoreResult<Vec<User>> {
        let mut users: Vec<User> = self
            .store
            .scan_all_typed(None, None, None)
            .into_core_error("scan users error")?
            .into_iter()
            .map(|(_, user)| user)
            .filter(|u| !u.is_deleted())
            .collect();

        sort_by_name(&mut users);
        Ok(users)
    }

    /// Search live users by case-insensitive substring on name or email.
    ///
    /// `limit` defaults to [`DEFAULT_SEARCH_LIMIT`] and is clamped to
    /// `1..=MAX_SEARCH_LIMIT`.
    pub fn search_users(&self, query: &str, limit: Option<usize>) -> CoreResult<Vec<User>> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT);
        let needle = query.to_lowercase();

        let mut users: Vec<User> = self
            .store
            .scan_all_typed(None, None, None)
            .into_core_error("scan users error")?
            .into_iter()
            .map(|(_, user)| user)
            .filter(|u| !u.is_deleted())
            .filter(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
            })
            .collect();

        sort_by_name(&mut users);
        users.truncate(limit);
        Ok(users)
    }
}

fn sort_by_name(users: &mut [User]) {
    users.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use projeta_commons::GlobalRole;
    use projeta_store::test_utils::InMemoryBackend;

    fn create_test_provider() -> UsersProvider {
        let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
        UsersProvider::new(backend)
    }

    fn create_test_user(id: i64, name: &str, email: &str) -> User {
        User {
            id: UserId::new(id),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hashed_password".to_string(),
            role: GlobalRole::Developer,
            created_at: 1000,
            updated_at: 1000,
            deleted_at: None,
        }
    }

    #[test]
    fn test_create_and_get_user() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "alice@example.com"))
            .unwrap();

        let user = provider.get_active_user(&UserId::new(1)).unwrap().unwrap();
        assert_eq!(user.name, "Alice");
    }

    #[test]
    fn test_create_duplicate_email_conflicts() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "alice@example.com"))
            .unwrap();

        let err = provider
            .create_user(create_test_user(2, "Alicia", "ALICE@example.com"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn test_email_uniqueness_is_exact_not_prefix() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Ana", "ana@example.com.br"))
            .unwrap();

        // A shorter email that is a byte prefix of an existing one is fine
        provider
            .create_user(create_test_user(2, "Ana", "ana@example.com"))
            .unwrap();

        let found = provider.get_user_by_email("ana@example.com").unwrap().unwrap();
        assert_eq!(found.id, UserId::new(2));
    }

    #[test]
    fn test_get_user_by_email_case_insensitive() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "Alice@Example.com"))
            .unwrap();

        let found = provider.get_user_by_email("alice@EXAMPLE.com").unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_update_user_changes_email_index() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "old@example.com"))
            .unwrap();

        let mut user = provider.get_active_user(&UserId::new(1)).unwrap().unwrap();
        user.email = "new@example.com".to_string();
        provider.update_user(user).unwrap();

        assert!(provider.get_user_by_email("old@example.com").unwrap().is_none());
        assert!(provider.get_user_by_email("new@example.com").unwrap().is_some());
    }

    #[test]
    fn test_update_email_collision_conflicts() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "alice@example.com"))
            .unwrap();
        provider
            .create_user(create_test_user(2, "Bob", "bob@example.com"))
            .unwrap();

        let mut bob = provider.get_active_user(&UserId::new(2)).unwrap().unwrap();
        bob.email = "alice@example.com".to_string();

        let err = provider.update_user(bob).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn test_update_keeping_own_email_is_allowed() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "alice@example.com"))
            .unwrap();

        let mut user = provider.get_active_user(&UserId::new(1)).unwrap().unwrap();
        user.name = "Alice Smith".to_string();
        provider.update_user(user).unwrap();

        let user = provider.get_active_user(&UserId::new(1)).unwrap().unwrap();
        assert_eq!(user.name, "Alice Smith");
    }

    #[test]
    fn test_update_missing_user_not_found() {
        let provider = create_test_provider();
        let err = provider
            .update_user(create_test_user(404, "Ghost", "ghost@example.com"))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_soft_delete_hides_user() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "alice@example.com"))
            .unwrap();

        provider.delete_user(&UserId::new(1)).unwrap();

        // Hidden from live lookups and the email index
        assert!(provider.get_active_user(&UserId::new(1)).unwrap().is_none());
        assert!(provider.get_user_by_email("alice@example.com").unwrap().is_none());

        // The raw row survives for the auth layer
        let raw = provider.get_user_by_id(&UserId::new(1)).unwrap().unwrap();
        assert!(raw.is_deleted());
    }

    #[test]
    fn test_delete_twice_not_found() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "alice@example.com"))
            .unwrap();

        provider.delete_user(&UserId::new(1)).unwrap();
        let err = provider.delete_user(&UserId::new(1)).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_deleted_account_frees_its_email() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "alice@example.com"))
            .unwrap();
        provider.delete_user(&UserId::new(1)).unwrap();

        provider
            .create_user(create_test_user(2, "Alice II", "alice@example.com"))
            .unwrap();

        let found = provider.get_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(found.id, UserId::new(2));
    }

    #[test]
    fn test_list_users_sorted_excludes_deleted() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "carol", "carol@example.com"))
            .unwrap();
        provider
            .create_user(create_test_user(2, "Alice", "alice@example.com"))
            .unwrap();
        provider
            .create_user(create_test_user(3, "Bob", "bob@example.com"))
            .unwrap();
        provider.delete_user(&UserId::new(3)).unwrap();

        let users = provider.list_users().unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "carol"]);
    }

    #[test]
    fn test_search_users_matches_name_or_email() {
        let provider = create_test_provider();
        provider
            .create_user(create_test_user(1, "Alice", "alice@example.com"))
            .unwrap();
        provider
            .create_user(create_test_user(2, "Bob", "bob@corp.io"))
            .unwrap();

        let by_name = provider.search_users("ali", None).unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Alice");

        let by_email = provider.search_users("CORP.IO", None).unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "Bob");
    }

    #[test]
    fn test_search_limit_is_clamped() {
        let provider = create_test_provider();
        for i in 1..=30 {
            provider
                .create_user(create_test_user(
                    i,
                    &format!("User {:02}", i),
                    &format!("user{}@example.com", i),
                ))
                .unwrap();
        }

        // Default limit
        assert_eq!(provider.search_users("user", None).unwrap().len(), DEFAULT_SEARCH_LIMIT);

        // Zero is clamped up to one
        assert_eq!(provider.search_users("user", Some(0)).unwrap().len(), 1);

        // Oversized limits are clamped down
        let all = provider.search_users("user", Some(500)).unwrap();
        assert_eq!(all.len(), 30.min(MAX_SEARCH_LIMIT));
    }
}
