//! Login request model

use serde::Deserialize;

/// Maximum email length accepted on login (prevent memory exhaustion)
const MAX_EMAIL_LENGTH: usize = 320;
/// Maximum password length accepted on login (bcrypt limit is 72 bytes,
/// but allow headroom so over-long input fails verification, not parsing)
const MAX_PASSWORD_LENGTH: usize = 256;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(deserialize_with = "validate_email_length")]
    pub email: String,
    #[serde(deserialize_with = "validate_password_length")]
    pub password: String,
}

fn validate_email_length<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.len() > MAX_EMAIL_LENGTH {
        return Err(serde::de::Error::custom(format!(
            "email exceeds maximum length of {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    Ok(s)
}

fn validate_password_length<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.len() > MAX_PASSWORD_LENGTH {
        return Err(serde::de::Error::custom(format!(
            "password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(s)
}
