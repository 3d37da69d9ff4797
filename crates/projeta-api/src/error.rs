//! Error-to-response mapping for all handlers.
//!
//! Every error leaves the service as `{"error": "<kind>", "message": "..."}`
//! with a status code derived from the error variant, so clients can branch
//! on either field without parsing prose.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use projeta_auth::AuthError;
use projeta_core::CoreError;
use serde::Serialize;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }
}

/// Map a domain error to its HTTP response.
///
/// `Retryable` carries a `Retry-After` hint so well-behaved clients back
/// off instead of hammering a contended project lock.
pub fn map_core_error_to_response(err: CoreError) -> HttpResponse {
    match err {
        CoreError::NotFound(message) => {
            HttpResponse::NotFound().json(ErrorBody::new("not_found", message))
        }
        CoreError::Forbidden(message) => {
            HttpResponse::Forbidden().json(ErrorBody::new("forbidden", message))
        }
        CoreError::Conflict(message) => {
            HttpResponse::Conflict().json(ErrorBody::new("conflict", message))
        }
        CoreError::InvalidState(message) => HttpResponse::build(StatusCode::UNPROCESSABLE_ENTITY)
            .json(ErrorBody::new("invalid_state", message)),
        CoreError::Retryable(message) => HttpResponse::ServiceUnavailable()
            .insert_header(("Retry-After", "1"))
            .json(ErrorBody::new("retryable", message)),
        CoreError::Internal(message) => {
            log::error!("Internal error: {}", message);
            HttpResponse::InternalServerError()
                .json(ErrorBody::new("internal", "Internal server error"))
        }
    }
}

/// Map an authentication error to its HTTP response.
///
/// Credential and token failures share one generic 401 message so the
/// endpoint cannot be used as a user-existence oracle.
pub fn map_auth_error_to_response(err: AuthError) -> HttpResponse {
    match err {
        AuthError::InvalidCredentials(_)
        | AuthError::TokenExpired
        | AuthError::InvalidSignature
        | AuthError::UntrustedIssuer(_) => HttpResponse::Unauthorized()
            .json(ErrorBody::new("unauthorized", "Invalid credentials")),
        AuthError::MissingAuthorization(message)
        | AuthError::MalformedAuthorization(message)
        | AuthError::MissingClaim(message) => {
            HttpResponse::Unauthorized().json(ErrorBody::new("unauthorized", message))
        }
        AuthError::WeakPassword(message) => HttpResponse::build(StatusCode::UNPROCESSABLE_ENTITY)
            .json(ErrorBody::new("weak_password", message)),
        AuthError::HashingError(message) | AuthError::DatabaseError(message) => {
            log::error!("Auth internal error: {}", message);
            HttpResponse::InternalServerError()
                .json(ErrorBody::new("internal", "Internal server error"))
        }
    }
}
