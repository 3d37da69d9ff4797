// Password hashing and validation

use crate::error::{AuthError, AuthResult};
use bcrypt::{hash, verify, DEFAULT_COST};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Bcrypt cost factor used when the caller does not override it.
pub const BCRYPT_COST: u32 = DEFAULT_COST;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length (bcrypt truncates at 72 bytes)
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Common passwords list (loaded once)
static COMMON_PASSWORDS: OnceLock<HashSet<String>> = OnceLock::new();

/// Hash a password with bcrypt.
///
/// Bcrypt is CPU-bound, so the work runs on the blocking thread pool
/// instead of stalling the async runtime.
///
/// # Errors
/// Returns `AuthError::HashingError` if bcrypt fails or the blocking
/// task cannot be joined.
pub async fn hash_password(password: &str, cost: Option<u32>) -> AuthResult<String> {
    let password = password.to_string();
    let cost = cost.unwrap_or(BCRYPT_COST);

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| AuthError::HashingError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashingError(format!("Task join error: {}", e)))?
}

/// Verify a plain text password against a stored bcrypt hash.
///
/// Runs on the blocking thread pool for the same reason as [`hash_password`].
/// Returns `Ok(false)` for a mismatch; `Err` only on bcrypt failure.
pub async fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || {
        verify(password, &hash).map_err(|e| AuthError::HashingError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashingError(format!("Task join error: {}", e)))?
}

/// Validate that a password is acceptable for account creation.
///
/// Checks length bounds (8..=72 bytes) and rejects entries from the
/// common passwords list.
///
/// # Errors
/// Returns `AuthError::WeakPassword` with the specific reason.
pub fn validate_password(password: &str) -> AuthResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }

    if is_common_password(password) {
        return Err(AuthError::WeakPassword(
            "Password is too common".to_string(),
        ));
    }

    Ok(())
}

/// Check membership in the common passwords list, built on first use.
fn is_common_password(password: &str) -> bool {
    let common_passwords = COMMON_PASSWORDS.get_or_init(|| {
        let passwords = vec![
            "password", "password1", "12345678", "123456789", "qwertyui", "qwerty123",
            "iloveyou", "sunshine", "princess", "football", "baseball", "superman",
            "trustno1", "letmein1", "passw0rd", "welcome1", "admin123", "changeme",
            "1q2w3e4r", "asdfghjk",
        ];
        passwords.iter().map(|s| s.to_string()).collect()
    });

    common_passwords.contains(password)
}
