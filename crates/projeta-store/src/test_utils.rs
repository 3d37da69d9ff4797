//! Test utilities for projeta-store.
//!
//! Provides an in-memory `StorageBackend` for unit tests and a RocksDB
//! wrapper for integration-style tests, with minimal boilerplate.

use anyhow::Result;
use parking_lot::RwLock;
use projeta_commons::storage::{
    KvIterator, Operation, Partition, StorageBackend, StorageError,
};
use projeta_commons::tables::all_column_families;
use rocksdb::{Options, DB};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tempfile::TempDir;

/// In-memory `StorageBackend` implementation.
///
/// Partitions map to ordered maps, so scans return keys in the same order a
/// RocksDB column family would. Intended for unit tests; nothing persists.
pub struct InMemoryBackend {
    partitions: RwLock<HashMap<String, BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            partitions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(
        &self,
        partition: &Partition,
        key: &[u8],
    ) -> std::result::Result<Option<Vec<u8>>, StorageError> {
        let partitions = self.partitions.read();
        let map = partitions
            .get(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn put(
        &self,
        partition: &Partition,
        key: &[u8],
        value: &[u8],
    ) -> std::result::Result<(), StorageError> {
        let mut partitions = self.partitions.write();
        let map = partitions
            .get_mut(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, partition: &Partition, key: &[u8]) -> std::result::Result<(), StorageError> {
        let mut partitions = self.partitions.write();
        let map = partitions
            .get_mut(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        map.remove(key);
        Ok(())
    }

    fn batch(&self, operations: Vec<Operation>) -> std::result::Result<(), StorageError> {
        let mut partitions = self.partitions.write();

        // Validate all partitions first so the batch is all-or-nothing
        for op in &operations {
            let name = match op {
                Operation::Put { partition, .. } => partition.name(),
                Operation::Delete { partition, .. } => partition.name(),
            };
            if !partitions.contains_key(name) {
                return Err(StorageError::PartitionNotFound(name.to_string()));
            }
        }

        for op in operations {
            match op {
                Operation::Put {
                    partition,
                    key,
                    value,
                } => {
                    if let Some(map) = partitions.get_mut(partition.name()) {
                        map.insert(key, value);
                    }
                }
                Operation::Delete { partition, key } => {
                    if let Some(map) = partitions.get_mut(partition.name()) {
                        map.remove(&key);
                    }
                }
            }
        }

        Ok(())
    }

    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        start_key: Option<&[u8]>,
        limit: Option<usize>,
    ) -> std::result::Result<KvIterator<'_>, StorageError> {
        let partitions = self.partitions.read();
        let map = partitions
            .get(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;

        // start_key takes precedence; otherwise seek to the prefix
        let start = start_key.or(prefix).map(|b| b.to_vec());

        let mut results: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
        let entries: Box<dyn Iterator<Item = (&Vec<u8>, &Vec<u8>)>> = match &start {
            Some(s) => Box::new(map.range(s.clone()..)),
            None => Box::new(map.iter()),
        };

        for (key, value) in entries {
            if let Some(p) = prefix {
                if !key.starts_with(p) {
                    break;
                }
            }
            results.push((key.clone(), value.clone()));
            if let Some(l) = limit {
                if results.len() >= l {
                    break;
                }
            }
        }

        Ok(Box::new(results.into_iter()))
    }

    fn partition_exists(&self, partition: &Partition) -> bool {
        self.partitions.read().contains_key(partition.name())
    }

    fn create_partition(&self, partition: &Partition) -> std::result::Result<(), StorageError> {
        self.partitions
            .write()
            .entry(partition.name().to_string())
            .or_default();
        Ok(())
    }

    fn list_partitions(&self) -> std::result::Result<Vec<Partition>, StorageError> {
        Ok(self
            .partitions
            .read()
            .keys()
            .map(Partition::new)
            .collect())
    }

    fn drop_partition(&self, partition: &Partition) -> std::result::Result<(), StorageError> {
        self.partitions.write().remove(partition.name());
        Ok(())
    }
}

/// Test database wrapper that automatically cleans up on drop.
pub struct TestDb {
    /// RocksDB instance
    pub db: Arc<DB>,
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with the specified column families.
    pub fn new(cf_names: &[&str]) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, temp_dir.path(), cf_names)?;

        Ok(Self {
            db: Arc::new(db),
            temp_dir,
        })
    }

    /// Create a test database with every domain table and index column family.
    pub fn with_domain_tables() -> Result<Self> {
        Self::new(&all_column_families())
    }
}
