// JWT issuance and validation

use crate::error::{AuthError, AuthResult};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use projeta_commons::{GlobalRole, UserId};
use serde::{Deserialize, Serialize};

/// Default access token lifetime in minutes
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// Issuer written into every token this service signs
pub const PROJETA_ISSUER: &str = "projeta";

/// Token type claim. Only access tokens are ever issued; the variant
/// exists so the bearer layer can reject foreign refresh-style tokens
/// signed with a leaked secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by a signed session token.
///
/// `role` and `email` are informational. Request authentication re-reads
/// the user record and takes the role from storage, never from the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user id, decimal string)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp, seconds)
    pub iat: usize,
    /// Email at issuance time
    pub email: Option<String>,
    /// Global role at issuance time
    pub role: Option<GlobalRole>,
    /// Token type, always "access" for tokens issued here
    pub token_type: TokenType,
}

impl JwtClaims {
    /// Create access token claims for a user.
    pub fn new(
        user_id: UserId,
        email: &str,
        role: GlobalRole,
        ttl_minutes: Option<i64>,
    ) -> Self {
        let now = chrono::Utc::now();
        let ttl = ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        let exp = now + chrono::Duration::minutes(ttl);

        Self {
            sub: user_id.to_string(),
            iss: PROJETA_ISSUER.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            email: Some(email.to_string()),
            role: Some(role),
            token_type: TokenType::Access,
        }
    }

    /// Parse the subject claim back into a typed user id.
    pub fn user_id(&self) -> AuthResult<UserId> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| AuthError::MissingClaim(format!("sub is not a user id: {}", self.sub)))
    }
}

/// Sign claims into a compact HS256 token.
///
/// # Errors
/// Returns `AuthError::HashingError` if encoding fails
pub fn generate_jwt_token(claims: &JwtClaims, secret: &str) -> AuthResult<String> {
    let header = Header::new(Algorithm::HS256);
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &encoding_key)
        .map_err(|e| AuthError::HashingError(format!("JWT encoding error: {}", e)))
}

/// Build and sign an access token in one step.
///
/// Returns both the token string and the claims so callers can report
/// the expiry without re-decoding.
pub fn create_and_sign_token(
    user_id: UserId,
    email: &str,
    role: GlobalRole,
    ttl_minutes: Option<i64>,
    secret: &str,
) -> AuthResult<(String, JwtClaims)> {
    let claims = JwtClaims::new(user_id, email, role, ttl_minutes);
    let token = generate_jwt_token(&claims, secret)?;
    Ok((token, claims))
}

/// Validate a token and extract its claims.
///
/// Verifies the HS256 signature, the expiration time, that the issuer is
/// in the trusted list, and that the subject claim is present.
///
/// # Errors
/// - `AuthError::InvalidSignature` if signature verification fails
/// - `AuthError::TokenExpired` if the token has expired
/// - `AuthError::UntrustedIssuer` if the issuer is not trusted
/// - `AuthError::MissingClaim` if the subject is empty
/// - `AuthError::MalformedAuthorization` for any other decode failure
pub fn validate_jwt_token(
    token: &str,
    secret: &str,
    trusted_issuers: &[String],
) -> AuthResult<JwtClaims> {
    let _header = decode_header(token)
        .map_err(|e| AuthError::MalformedAuthorization(format!("Invalid JWT header: {}", e)))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_nbf = false;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data =
        decode::<JwtClaims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedAuthorization(format!("JWT decode error: {}", e)),
        })?;

    let claims = token_data.claims;

    verify_issuer(&claims.iss, trusted_issuers)?;

    if claims.sub.is_empty() {
        return Err(AuthError::MissingClaim("sub".to_string()));
    }

    Ok(claims)
}

/// Verify the issuer is in the trusted list.
///
/// An empty trusted list rejects every issuer, so a deployment that
/// forgets to configure issuers fails closed instead of accepting
/// arbitrary tokens.
fn verify_issuer(issuer: &str, trusted_issuers: &[String]) -> AuthResult<()> {
    if trusted_issuers.is_empty() {
        return Err(AuthError::UntrustedIssuer(format!(
            "No trusted issuers configured. Rejecting issuer: {}",
            issuer
        )));
    }

    if trusted_issuers.iter().any(|i| i == issuer) {
        Ok(())
    } else {
        Err(AuthError::UntrustedIssuer(issuer.to_string()))
    }
}
