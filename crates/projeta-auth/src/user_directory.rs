use crate::error::AuthResult;
use projeta_commons::{User, UserId};

/// Abstraction over user persistence for authentication flows.
///
/// Keeps this crate storage-agnostic: the provider-backed implementation
/// lives in projeta-core to avoid a crate cycle.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by id for request authentication.
    ///
    /// Returns `Ok(None)` when no user with that id exists. Soft-deleted
    /// users are returned as stored; the caller decides how to treat them.
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;
}
