//! Table providers for the domain entities.
//!
//! Each provider owns one `IndexedEntityStore` and exposes typed CRUD for
//! its table. Cross-entity rules live above this layer: the membership
//! engine for roster writes, the API handlers for the remaining checks.

pub mod members;
pub mod projects;
pub mod tasks;
pub mod users;
