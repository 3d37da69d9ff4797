//! HTTP API layer for Projeta
//!
//! Actix-web handlers, wire models, and route configuration. Handlers
//! resolve the Bearer session, translate JSON bodies into core calls,
//! and map [`projeta_core::CoreError`] / [`projeta_auth::AuthError`]
//! onto status codes. All authorization for roster changes lives in the
//! membership engine, not here.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod routes;

pub use routes::configure_routes;
