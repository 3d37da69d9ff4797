//! Projects table provider.

pub mod projects_provider;

pub use projects_provider::ProjectsProvider;
