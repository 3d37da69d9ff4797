// Authentication error types

use thiserror::Error;

/// Errors produced by credential handling and request authentication.
///
/// Every variant maps to HTTP 401 at the API layer except `WeakPassword`
/// (a validation failure) and `DatabaseError` (an internal failure).
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing authorization: {0}")]
    MissingAuthorization(String),

    #[error("Malformed authorization: {0}")]
    MalformedAuthorization(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Untrusted token issuer: {0}")]
    UntrustedIssuer(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expired_display() {
        let err = AuthError::TokenExpired;
        assert_eq!(err.to_string(), "Token has expired");
    }

    #[test]
    fn test_weak_password_display() {
        let err = AuthError::WeakPassword("too short".to_string());
        assert_eq!(err.to_string(), "Weak password: too short");
    }

    #[test]
    fn test_untrusted_issuer_display() {
        let err = AuthError::UntrustedIssuer("evil.example".to_string());
        assert_eq!(err.to_string(), "Untrusted token issuer: evil.example");
    }
}
