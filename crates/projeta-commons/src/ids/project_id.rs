//! Type-safe wrapper for project identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage_key::{decode_key, encode_key, StorageKey};

/// Type-safe wrapper for project identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(i64);

impl ProjectId {
    #[inline]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProjectId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProjectId> for i64 {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl StorageKey for ProjectId {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(&self.0)
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key::<i64>(bytes).map(ProjectId)
    }
}
