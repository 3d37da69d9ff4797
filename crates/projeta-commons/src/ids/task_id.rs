//! Type-safe wrapper for task identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage_key::{decode_key, encode_key, StorageKey};

/// Type-safe wrapper for task identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    #[inline]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<TaskId> for i64 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl StorageKey for TaskId {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(&self.0)
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key::<i64>(bytes).map(TaskId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_storage_key() {
        let id = TaskId::new(555);
        let bytes = id.storage_key();
        let decoded = TaskId::from_storage_key(&bytes).unwrap();
        assert_eq!(id, decoded);
    }
}
