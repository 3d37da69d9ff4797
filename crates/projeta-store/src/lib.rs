//! # projeta-store
//!
//! Low-level key-value store layer for the domain tables. This crate isolates
//! all direct RocksDB interactions, allowing projeta-core to remain free of
//! RocksDB dependencies.
//!
//! ## Architecture
//!
//! ```text
//! projeta-core (business logic)
//!     ↓
//! projeta-store (K/V operations, indexes, locks)
//!     ↓
//! RocksDB (storage engine)
//! ```

pub mod entity_store;
pub mod indexed_store;
pub mod locks;
pub mod rocksdb_impl;
pub mod rocksdb_init;
pub mod test_utils;

pub use entity_store::EntityStore;
pub use indexed_store::{IndexDefinition, IndexedEntityStore};
pub use locks::{ProjectLocks, ProjectWriteGuard};
pub use rocksdb_impl::RocksDBBackend;
pub use rocksdb_init::RocksDbInit;

// Re-export storage types from projeta-commons to avoid import inconsistency
pub use projeta_commons::{Operation, Partition, StorageBackend, StorageError, StorageKey};
