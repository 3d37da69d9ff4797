//! Type-safe entity reads with generic key types.
//!
//! This module provides the `EntityStore<K, V>` trait which uses typed keys
//! to provide compile-time safety and prevent wrong-key bugs. Writes are not
//! part of this trait: they must go through `IndexedEntityStore`, which keeps
//! secondary indexes in step with the row.
//!
//! ## Architecture
//!
//! ```text
//! EntityStore<K, V>        ← Typed point reads with generic keys (this file)
//!     ↓
//! StorageBackend           ← Generic K/V operations (projeta-commons)
//!     ↓
//! RocksDB / in-memory      ← Actual storage implementation
//! ```
//!
//! ## Type Safety
//!
//! ```rust,ignore
//! // Compile-time safety prevents wrong keys:
//! let user_id = UserId::new(1);
//! let task_id = TaskId::new(9);
//!
//! user_store.get(&user_id)   // ✓ Compiles
//! user_store.get(&task_id)   // ✗ Compile error - wrong key type!
//! ```

use projeta_commons::serialization::Storable;
use projeta_commons::storage::{Partition, Result, StorageBackend};
use projeta_commons::storage_key::StorageKey;
use std::sync::Arc;

/// Trait for typed entity reads with type-safe keys and automatic
/// deserialization.
///
/// ## Type Parameters
/// - `K`: Key type that implements `StorageKey` (UserId, ProjectId, ...)
/// - `V`: Entity type that implements `Storable` (bincode serialization)
///
/// ## Required Methods
/// - `backend()`: Returns the storage backend
/// - `partition()`: Returns the partition for this entity type
pub trait EntityStore<K, V>
where
    K: StorageKey,
    V: Storable,
{
    /// Returns a reference to the storage backend.
    fn backend(&self) -> &Arc<dyn StorageBackend>;

    /// Returns the partition for this entity type.
    fn partition(&self) -> &Partition;

    /// Deserializes bytes to an entity via its `Storable` impl.
    fn deserialize(&self, bytes: &[u8]) -> Result<V> {
        V::decode(bytes)
    }

    /// Retrieves an entity by key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, key: &K) -> Result<Option<V>> {
        match self.backend().get(self.partition(), &key.storage_key())? {
            Some(bytes) => Ok(Some(self.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Checks whether an entity exists without deserializing it.
    fn exists(&self, key: &K) -> Result<bool> {
        Ok(self
            .backend()
            .get(self.partition(), &key.storage_key())?
            .is_some())
    }
}
