//! Authentication middleware: Bearer token extraction and JWT verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use todo_core::auth::authenticate;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

pub use todo_core::auth::AuthenticatedUser;

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects [`AuthenticatedUser`] into request extensions.
///
/// Any failure short-circuits with a 401 carrying `WWW-Authenticate: Bearer`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user = authenticate(header, state.config.jwt_secret.as_bytes()).map_err(|fault| {
        debug!(path = %request.uri().path(), %fault, "authentication failed");
        AppError::from(fault)
    })?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
