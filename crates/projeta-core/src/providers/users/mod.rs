//! Users table provider and indexes.

pub mod users_indexes;
pub mod users_provider;

pub use users_provider::{UsersProvider, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
