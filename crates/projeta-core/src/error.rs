use projeta_commons::StorageError;
use thiserror::Error;

/// Errors that can occur in domain operations.
///
/// Variants map one-to-one onto HTTP statuses at the API layer:
/// NotFound 404, Forbidden 403, Conflict 409, InvalidState 422,
/// Retryable 503 (with Retry-After), Internal 500.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Temporarily unavailable: {0}")]
    Retryable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for domain operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

// Convert from projeta_store::StorageError.
//
// Lock timeouts become Retryable so callers can surface a retry hint, and
// unique-constraint hits become Conflict; everything else is an internal
// storage failure.
impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::LockTimeout(msg) => CoreError::Retryable(msg),
            StorageError::UniqueConstraintViolation(msg) => CoreError::Conflict(msg),
            other => CoreError::Internal(other.to_string()),
        }
    }
}

/// Extension trait for annotating storage results with an operation context.
pub trait CoreResultExt<T> {
    /// Converts a storage result into a core result, prefixing the error
    /// message with `context`.
    fn into_core_error(self, context: &str) -> CoreResult<T>;
}

impl<T> CoreResultExt<T> for std::result::Result<T, StorageError> {
    fn into_core_error(self, context: &str) -> CoreResult<T> {
        self.map_err(|err| match err {
            StorageError::LockTimeout(msg) => CoreError::Retryable(format!("{}: {}", context, msg)),
            StorageError::UniqueConstraintViolation(msg) => {
                CoreError::Conflict(format!("{}: {}", context, msg))
            }
            other => CoreError::Internal(format!("{}: {}", context, other)),
        })
    }
}
