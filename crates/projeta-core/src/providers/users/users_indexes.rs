//! Users table index definitions.

use projeta_commons::models::User;
use projeta_commons::storage::Partition;
use projeta_commons::{IndexPartition, UserId};
use projeta_store::IndexDefinition;
use std::sync::Arc;

/// Index for looking up users by email (unique).
///
/// Key format: `{email_lowercase}`
///
/// Emails are stored lowercase for case-insensitive lookups. Soft-deleted
/// accounts are not indexed, so a deactivated account frees its email and
/// login lookups never resolve one.
pub struct UserEmailIndex;

impl IndexDefinition<UserId, User> for UserEmailIndex {
    fn partition(&self) -> Partition {
        IndexPartition::UsersEmailIdx.partition().clone()
    }

    fn extract_key(&self, _primary_key: &UserId, user: &User) -> Option<Vec<u8>> {
        if user.is_deleted() {
            return None;
        }
        Some(user.email.to_lowercase().into_bytes())
    }
}

/// Create the default set of indexes for the users table.
pub fn create_users_indexes() -> Vec<Arc<dyn IndexDefinition<UserId, User>>> {
    vec![Arc::new(UserEmailIndex)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use projeta_commons::GlobalRole;

    fn create_test_user(id: i64, email: &str) -> User {
        User {
            id: UserId::new(id),
            name: format!("User {}", id),
            email: email.to_string(),
            password_hash: "hashed_password".to_string(),
            role: GlobalRole::Developer,
            created_at: 1000,
            updated_at: 1000,
            deleted_at: None,
        }
    }

    #[test]
    fn test_email_index_key_is_lowercase() {
        let user = create_test_user(1, "Alice@Example.COM");

        let key = UserEmailIndex.extract_key(&user.id, &user).unwrap();
        assert_eq!(String::from_utf8(key).unwrap(), "alice@example.com");
    }

    #[test]
    fn test_deleted_user_is_not_indexed() {
        let mut user = create_test_user(1, "gone@example.com");
        user.deleted_at = Some(2000);

        assert!(UserEmailIndex.extract_key(&user.id, &user).is_none());
    }

    #[test]
    fn test_create_users_indexes() {
        let indexes = create_users_indexes();
        assert_eq!(indexes.len(), 1);
        assert_eq!(
            indexes[0].partition().name(),
            IndexPartition::UsersEmailIdx.name()
        );
    }
}
