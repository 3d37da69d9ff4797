//! Projeta Server Library
//!
//! This library exposes server modules for integration testing.

pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod middleware;

pub use projeta_api::routes;
