//! Shared configuration types.
//!
//! Lives in commons so projeta-store can consume storage tuning settings
//! without depending on the server crate.

use serde::{Deserialize, Serialize};

/// RocksDB tuning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbSettings {
    /// Write buffer size per column family in bytes (default: 2MB).
    /// Kept small: with one CF per table and index, buffers multiply.
    #[serde(default = "default_write_buffer_size")]
    pub write_buffer_size: usize,

    /// Maximum number of write buffers (default: 2)
    #[serde(default = "default_max_write_buffers")]
    pub max_write_buffers: i32,

    /// Block cache size for reads in bytes (default: 4MB, SHARED across all
    /// column families, so adding CFs does not multiply memory)
    #[serde(default = "default_block_cache_size")]
    pub block_cache_size: usize,

    /// Maximum number of background jobs (default: 4)
    #[serde(default = "default_max_background_jobs")]
    pub max_background_jobs: i32,

    /// Maximum number of open files RocksDB can keep open (default: 512).
    /// Set to -1 for unlimited.
    #[serde(default = "default_max_open_files")]
    pub max_open_files: i32,

    /// Compact all column families on startup (default: true).
    /// Reduces SST file count; may increase startup time for large databases.
    #[serde(default = "default_compact_on_startup")]
    pub compact_on_startup: bool,
}

impl Default for RocksDbSettings {
    fn default() -> Self {
        Self {
            write_buffer_size: default_write_buffer_size(),
            max_write_buffers: default_max_write_buffers(),
            block_cache_size: default_block_cache_size(),
            max_background_jobs: default_max_background_jobs(),
            max_open_files: default_max_open_files(),
            compact_on_startup: default_compact_on_startup(),
        }
    }
}

fn default_write_buffer_size() -> usize {
    2 * 1024 * 1024 // 2MB
}

fn default_max_write_buffers() -> i32 {
    2
}

fn default_block_cache_size() -> usize {
    4 * 1024 * 1024 // 4MB
}

fn default_max_background_jobs() -> i32 {
    4
}

fn default_max_open_files() -> i32 {
    512
}

fn default_compact_on_startup() -> bool {
    true
}
