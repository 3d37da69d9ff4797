//! User entity for the users table.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::models::roles::GlobalRole;
use crate::serialization::Storable;

/// User entity for the users table.
///
/// ## Fields
/// - `id`: Unique user identifier (Snowflake)
/// - `name`: Display name
/// - `email`: Unique email address, stored as given, indexed lowercase
/// - `password_hash`: bcrypt hash of the password
/// - `role`: Global role (admin, manager, developer)
/// - `created_at` / `updated_at`: Unix timestamps in milliseconds
/// - `deleted_at`: Soft delete timestamp (None = active account)
///
/// ## Serialization
/// - **RocksDB**: bincode (compact binary format)
/// - **API**: JSON via Serde (password hash is never exposed through DTOs)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: GlobalRole,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl User {
    /// Check if this account has been soft deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Mark the account as deleted now.
    pub fn mark_deleted(&mut self) {
        let now = chrono::Utc::now().timestamp_millis();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

impl Storable for User {}
