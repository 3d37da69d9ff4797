//! Type-safe wrapper for project membership row identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage_key::{decode_key, encode_key, StorageKey};

/// Type-safe wrapper for membership row identifiers.
///
/// Identifies one membership row, independent of the `(project, user)` pair
/// it binds. A user removed and re-added to the same project gets a fresh
/// `MemberId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    #[inline]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MemberId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<MemberId> for i64 {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

impl StorageKey for MemberId {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(&self.0)
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key::<i64>(bytes).map(MemberId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_storage_key() {
        let id = MemberId::new(314159);
        let bytes = id.storage_key();
        let decoded = MemberId::from_storage_key(&bytes).unwrap();
        assert_eq!(id, decoded);
    }
}
