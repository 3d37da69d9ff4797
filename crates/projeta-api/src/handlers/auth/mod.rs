//! Authentication handlers.
//!
//! ## Endpoints
//! - POST /v1/api/auth/login - Verify credentials and issue an access token
//! - POST /v1/api/auth/register - Create an account (public)
//! - GET /v1/api/auth/me - Current user's record

pub mod models;

mod login;
mod me;
mod register;

pub use login::login_handler;
pub use me::me_handler;
pub use register::register_handler;
