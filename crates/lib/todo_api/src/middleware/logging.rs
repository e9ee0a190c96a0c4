//! Request/response logging, with extra detail for `/auth` traffic.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use todo_core::ratelimit::AUTH_PATH_PREFIX;
use tracing::{info, warn};

use super::rate_limit::client_identity;

/// Path whose 401s are reported as failed login attempts.
const LOGIN_PATH: &str = "/auth/login";

/// Axum middleware: logs method, path, status and elapsed time.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let is_auth = path.starts_with(AUTH_PATH_PREFIX);
    let client = client_identity(&request);
    let started = Instant::now();

    if is_auth {
        info!(%method, %path, %client, "authentication request");
    } else {
        info!(%method, %path, "request");
    }

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();

    info!(%method, %path, status = status.as_u16(), elapsed_ms, "response");

    if is_auth && method == Method::POST && path == LOGIN_PATH {
        match status {
            StatusCode::OK => info!(%client, "successful login"),
            StatusCode::UNAUTHORIZED => warn!(%client, "failed login attempt"),
            _ => {}
        }
    }

    response
}
