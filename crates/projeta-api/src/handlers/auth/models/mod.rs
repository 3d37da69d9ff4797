//! Authentication request/response models.

mod login_request;
mod login_response;

pub use login_request::LoginRequest;
pub use login_response::LoginResponse;
