//! HTTP handlers, grouped by resource.

pub mod auth;
pub mod members;
pub mod projects;
pub mod tasks;
pub mod users;

use projeta_core::{CoreError, CoreResult};

/// Run a synchronous store operation on the blocking pool.
///
/// Scans and multi-row reads go through here; cheap point reads and writes
/// stay inline in the handlers.
pub(crate) async fn run_blocking<T, F>(f: F) -> CoreResult<T>
where
    F: FnOnce() -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CoreError::Internal(format!("spawn_blocking error: {}", e)))?
}
