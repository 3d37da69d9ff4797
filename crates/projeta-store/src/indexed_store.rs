//! Indexed entity store with automatic secondary index management.
//!
//! This module provides `IndexedEntityStore<K, V>` which extends `EntityStore`
//! with automatic secondary index maintenance using the backend's atomic
//! write batches.
//!
//! ## Features
//!
//! - **Automatic index management**: Indexes are updated on insert/update/delete
//! - **Atomic operations**: Entity + all indexes written in a single batch
//!
//! ## Architecture
//!
//! ```text
//! IndexedEntityStore<K, V>
//!     │
//!     ├── insert(key, entity)
//!     │       │
//!     │       ▼
//!     │   backend.batch([
//!     │       Put { entity },
//!     │       Put { index1 },
//!     │       Put { index2 },
//!     │   ])
//!     │
//!     ├── update(key, entity)
//!     │       │
//!     │       ▼
//!     │   1. Fetch old entity
//!     │   2. backend.batch([
//!     │       Delete { old_index1 },  // if changed
//!     │       Put { entity },
//!     │       Put { new_index1 },
//!     │   ])
//!     │
//!     └── delete_with_entity(key, entity)
//!             │
//!             ▼
//!         backend.batch([
//!             Delete { entity },
//!             Delete { index1 },
//!             Delete { index2 },
//!         ])
//! ```

use crate::entity_store::EntityStore;
use projeta_commons::serialization::Storable;
use projeta_commons::storage::{Operation, Partition, Result, StorageBackend, StorageError};
use projeta_commons::storage_key::StorageKey;
use std::sync::Arc;

/// Defines how to extract index keys from an entity.
///
/// Each index is defined by:
/// - A partition where index entries are stored
/// - A function to extract the index key from the entity
/// - Optional: custom index value (default is the primary key for reverse
///   lookup)
///
/// ## Index Key Design
///
/// For range queries, design composite keys with the most selective field
/// first. Use order-preserving encoding for numeric fields so lexicographic
/// order equals numeric order, and append the primary key when an index can
/// hold multiple entries per value. Return `None` from `extract_key()` to
/// skip indexing an entity (conditional indexes).
pub trait IndexDefinition<K, V>: Send + Sync
where
    K: StorageKey,
    V: Storable,
{
    /// Returns the partition for this index.
    ///
    /// Must be unique across all indexes in the system.
    fn partition(&self) -> Partition;

    /// Extracts the index key from the entity.
    ///
    /// Returns `None` if this entity should not be indexed.
    fn extract_key(&self, primary_key: &K, entity: &V) -> Option<Vec<u8>>;

    /// Returns the value to store in the index.
    ///
    /// Default: the primary key bytes for reverse lookup.
    fn index_value(&self, primary_key: &K, _entity: &V) -> Vec<u8> {
        primary_key.storage_key()
    }
}

/// An `EntityStore` that automatically manages secondary indexes.
///
/// All write operations (insert/update/delete) atomically update the entity
/// and all defined indexes using the backend's write batch.
///
/// ## Thread Safety
///
/// This struct is `Send + Sync` and can be safely shared across threads.
/// The underlying `StorageBackend` handles concurrent access.
pub struct IndexedEntityStore<K, V>
where
    K: StorageKey,
    V: Storable + 'static,
{
    backend: Arc<dyn StorageBackend>,
    partition: Partition,
    indexes: Vec<Arc<dyn IndexDefinition<K, V>>>,
    _marker: std::marker::PhantomData<(K, V)>,
}

impl<K, V> IndexedEntityStore<K, V>
where
    K: StorageKey,
    V: Storable + 'static,
{
    /// Creates a new IndexedEntityStore.
    ///
    /// Ensures the main partition and all index partitions exist.
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        partition: &Partition,
        indexes: Vec<Arc<dyn IndexDefinition<K, V>>>,
    ) -> Self {
        // Ignore create errors: partitions may already exist
        let _ = backend.create_partition(partition);
        for index in &indexes {
            let _ = backend.create_partition(&index.partition());
        }

        Self {
            backend,
            partition: partition.clone(),
            indexes,
            _marker: std::marker::PhantomData,
        }
    }

    /// Finds the position of the index stored in the given partition.
    pub fn find_index_by_partition(&self, partition: &Partition) -> Option<usize> {
        self.indexes
            .iter()
            .position(|index| index.partition() == *partition)
    }

    // ========================================================================
    // Sync Write Operations (Atomic with Indexes)
    // ========================================================================

    /// Inserts a new entity with all indexes atomically.
    pub fn insert(&self, key: &K, entity: &V) -> Result<()> {
        let mut operations = Vec::with_capacity(1 + self.indexes.len());

        // 1. Main entity write
        let value = entity.encode()?;
        operations.push(Operation::Put {
            partition: self.partition.clone(),
            key: key.storage_key(),
            value,
        });

        // 2. Index writes
        for index in &self.indexes {
            if let Some(index_key) = index.extract_key(key, entity) {
                operations.push(Operation::Put {
                    partition: index.partition(),
                    key: index_key,
                    value: index.index_value(key, entity),
                });
            }
        }

        self.backend.batch(operations)
    }

    /// Updates an entity and its indexes atomically.
    ///
    /// Fetches the old entity first to determine stale index entries. If you
    /// already have the old entity, use `update_with_old()` instead.
    pub fn update(&self, key: &K, new_entity: &V) -> Result<()> {
        let old_entity = self.get(key)?;
        self.update_internal(key, old_entity.as_ref(), new_entity)
    }

    /// Updates an entity when you already have the old one.
    pub fn update_with_old(&self, key: &K, old_entity: Option<&V>, new_entity: &V) -> Result<()> {
        self.update_internal(key, old_entity, new_entity)
    }

    fn update_internal(&self, key: &K, old_entity: Option<&V>, new_entity: &V) -> Result<()> {
        let mut operations = Vec::with_capacity(1 + self.indexes.len() * 2);

        // 1. Delete stale index entries (entity existed and index key changed)
        if let Some(old) = old_entity {
            for index in &self.indexes {
                let old_index_key = index.extract_key(key, old);
                let new_index_key = index.extract_key(key, new_entity);

                if old_index_key != new_index_key {
                    if let Some(old_key) = old_index_key {
                        operations.push(Operation::Delete {
                            partition: index.partition(),
                            key: old_key,
                        });
                    }
                }
            }
        }

        // 2. Write new entity
        let value = new_entity.encode()?;
        operations.push(Operation::Put {
            partition: self.partition.clone(),
            key: key.storage_key(),
            value,
        });

        // 3. Write new index entries (only if changed or entity is new)
        for index in &self.indexes {
            let new_index_key = index.extract_key(key, new_entity);
            let old_index_key = old_entity.and_then(|old| index.extract_key(key, old));

            if new_index_key != old_index_key {
                if let Some(idx_key) = new_index_key {
                    operations.push(Operation::Put {
                        partition: index.partition(),
                        key: idx_key,
                        value: index.index_value(key, new_entity),
                    });
                }
            }
        }

        self.backend.batch(operations)
    }

    /// Deletes an entity and all its index entries atomically.
    ///
    /// The caller passes the current entity so the stale index keys can be
    /// derived without another fetch.
    pub fn delete_with_entity(&self, key: &K, entity: &V) -> Result<()> {
        let mut operations = Vec::with_capacity(1 + self.indexes.len());

        operations.push(Operation::Delete {
            partition: self.partition.clone(),
            key: key.storage_key(),
        });

        for index in &self.indexes {
            if let Some(index_key) = index.extract_key(key, entity) {
                operations.push(Operation::Delete {
                    partition: index.partition(),
                    key: index_key,
                });
            }
        }

        self.backend.batch(operations)
    }

    // ========================================================================
    // Sync Read/Scan Operations
    // ========================================================================

    /// Scans an index by prefix and returns matching entities.
    ///
    /// Returns (primary_key, entity) tuples in index key order.
    pub fn scan_by_index(
        &self,
        index_idx: usize,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<(K, V)>> {
        let index = self
            .indexes
            .get(index_idx)
            .ok_or_else(|| StorageError::Other(format!("Index {} not found", index_idx)))?;

        let iter = self.backend.scan(&index.partition(), prefix, None, limit)?;

        let mut results = Vec::new();
        for (_index_key, primary_key_bytes) in iter {
            let primary_key =
                K::from_storage_key(&primary_key_bytes).map_err(StorageError::SerializationError)?;

            // Fetch the actual entity; skip dangling index entries
            if let Some(entity) = self.get(&primary_key)? {
                results.push((primary_key, entity));
            }
        }

        Ok(results)
    }

    /// Looks up the primary key stored under an exact index key.
    ///
    /// Unlike the prefix scans this is a point read on the index partition,
    /// so `a@b.c` never matches an entry for `a@b.co`. Use this for unique
    /// indexes. Returns `Ok(None)` when no entry matches exactly.
    pub fn get_by_index_exact(&self, index_idx: usize, index_key: &[u8]) -> Result<Option<K>> {
        let index = self
            .indexes
            .get(index_idx)
            .ok_or_else(|| StorageError::Other(format!("Index {} not found", index_idx)))?;

        match self.backend.get(&index.partition(), index_key)? {
            Some(primary_key_bytes) => Ok(Some(
                K::from_storage_key(&primary_key_bytes).map_err(StorageError::SerializationError)?,
            )),
            None => Ok(None),
        }
    }

    /// Scans the main partition returning typed (key, entity) pairs.
    pub fn scan_all_typed(
        &self,
        limit: Option<usize>,
        prefix: Option<&K>,
        start_key: Option<&K>,
    ) -> Result<Vec<(K, V)>> {
        let prefix_bytes = prefix.map(|k| k.storage_key());
        let start_bytes = start_key.map(|k| k.storage_key());

        let iter = self.backend.scan(
            &self.partition,
            prefix_bytes.as_deref(),
            start_bytes.as_deref(),
            limit,
        )?;

        let mut results = Vec::new();
        for (key_bytes, value_bytes) in iter {
            let key = K::from_storage_key(&key_bytes).map_err(StorageError::SerializationError)?;
            let entity = V::decode(&value_bytes)?;
            results.push((key, entity));
        }

        Ok(results)
    }
}

impl<K, V> EntityStore<K, V> for IndexedEntityStore<K, V>
where
    K: StorageKey,
    V: Storable + 'static,
{
    fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    fn partition(&self) -> &Partition {
        &self.partition
    }
}

impl<K, V> Clone for IndexedEntityStore<K, V>
where
    K: StorageKey,
    V: Storable + 'static,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            partition: self.partition.clone(),
            indexes: self.indexes.clone(),
            _marker: std::marker::PhantomData,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
