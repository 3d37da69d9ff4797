//! Project members table provider and indexes.

pub mod members_indexes;
pub mod members_provider;

pub use members_provider::MembersProvider;
