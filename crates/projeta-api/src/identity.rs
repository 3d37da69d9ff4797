//! Session resolution for protected handlers.

use crate::error::map_auth_error_to_response;
use actix_web::{HttpRequest, HttpResponse};
use projeta_auth::{authenticate_request, AuthenticatedRequest};
use projeta_core::AppContext;

/// Resolve the Bearer session on a protected route.
///
/// On failure the caller returns the prepared 401 response as-is:
///
/// ```ignore
/// let session = match require_session(&req, &ctx).await {
///     Ok(session) => session,
///     Err(resp) => return resp,
/// };
/// ```
pub async fn require_session(
    req: &HttpRequest,
    ctx: &AppContext,
) -> Result<AuthenticatedRequest, HttpResponse> {
    let auth = ctx.auth();
    authenticate_request(
        req,
        ctx.user_directory(),
        &auth.jwt_secret,
        &auth.trusted_issuers,
    )
    .await
    .map_err(map_auth_error_to_response)
}
