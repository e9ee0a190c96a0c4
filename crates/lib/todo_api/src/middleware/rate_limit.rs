//! Edge rate limiting keyed by peer address.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use todo_core::ratelimit::EndpointClass;
use tracing::warn;

use crate::AppState;
use crate::error::AppError;

/// Identity used when the peer address is unavailable.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Peer IP from `ConnectInfo`, or [`UNKNOWN_CLIENT`].
pub fn client_identity(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Axum middleware: rejects with 429 once a client exceeds its window budget.
///
/// `/auth*` paths use the stricter auth limit; everything else the default.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_identity(&request);
    let class = EndpointClass::for_path(request.uri().path());

    if !state.rate_limiter.admit(&client, class) {
        warn!(client = %client, path = %request.uri().path(), "rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}
