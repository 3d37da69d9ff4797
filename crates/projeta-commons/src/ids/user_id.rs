//! Type-safe wrapper for user identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage_key::{decode_key, encode_key, StorageKey};

/// Type-safe wrapper for user identifiers.
///
/// Ensures user IDs cannot be accidentally used where project or task IDs
/// are expected. Serializes as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a new UserId from a raw i64.
    #[inline]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw i64 value.
    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl StorageKey for UserId {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(&self.0)
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key::<i64>(bytes).map(UserId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_storage_key() {
        let id = UserId::new(123456789);
        let bytes = id.storage_key();
        let decoded = UserId::from_storage_key(&bytes).unwrap();
        assert_eq!(id, decoded);
    }

    #[test]
    fn test_storage_key_ordering() {
        // Storage keys must sort in the same order as the ids themselves
        let a = UserId::new(100).storage_key();
        let b = UserId::new(200).storage_key();
        let c = UserId::new(1000).storage_key();

        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_display() {
        assert_eq!(UserId::new(42).to_string(), "42");
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");

        let back: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }
}
