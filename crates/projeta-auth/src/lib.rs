// Projeta authentication library
// Password hashing, JWT issuance and validation, and request authentication

pub mod error;
pub mod extractor;
pub mod jwt;
pub mod password;
pub mod user_directory;

// Re-export commonly used types
pub use error::{AuthError, AuthResult};
pub use extractor::{authenticate_request, AuthenticatedRequest};
pub use jwt::{create_and_sign_token, validate_jwt_token, JwtClaims, TokenType};
pub use user_directory::UserDirectory;
