//! Tasks table provider and indexes.

pub mod tasks_indexes;
pub mod tasks_provider;

pub use tasks_provider::{TaskFilter, TasksProvider};
