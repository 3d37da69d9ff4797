//! Shared types for the Projeta backend.
//!
//! This crate holds everything the other crates agree on: typed identifiers,
//! domain entities, role enums, the storage abstraction, and the serialization
//! contracts used to persist entities.

pub mod config;
pub mod ids;
pub mod models;
pub mod serialization;
pub mod storage;
pub mod storage_key;
pub mod tables;

pub use config::RocksDbSettings;
pub use ids::{MemberId, ProjectId, SnowflakeGenerator, TaskId, UserId};
pub use models::{
    CallerContext, GlobalRole, MemberRole, Project, ProjectMember, ProjectStatus, Task,
    TaskPriority, TaskStatus, User,
};
pub use serialization::Storable;
pub use storage::{KvIterator, Operation, Partition, StorageBackend, StorageError};
pub use storage_key::{decode_key, encode_key, encode_prefix, StorageKey};
pub use tables::{DomainTable, IndexPartition};
