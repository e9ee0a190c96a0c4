//! # todo_api
//!
//! HTTP API library for the todo backend.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, patch, post};
use todo_core::ratelimit::RateLimiter;
use todo_core::store::Store;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::config::ApiConfig;
use crate::handlers::{auth, root, tasks};

pub use todo_core::migrate::migrate;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User and task persistence.
    pub store: Arc<dyn Store>,
    /// API configuration.
    pub config: ApiConfig,
    /// Per-client sliding-window limiter shared by every request.
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        Self {
            store,
            config,
            rate_limiter,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| {
            // Credentialed CORS cannot use a wildcard origin.
            if o == "*" {
                warn!("ignoring wildcard CORS origin; list origins explicitly");
                return None;
            }
            match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

/// Builds the Axum router with all routes and shared state.
///
/// Layer order, outermost first: CORS, rate limiting, request logging.
pub fn router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public = Router::new()
        .route("/", get(root::root))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/tasks",
            get(tasks::list_tasks_handler).post(tasks::create_task_handler),
        )
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task_handler)
                .put(tasks::update_task_handler)
                .delete(tasks::delete_task_handler),
        )
        .route(
            "/api/tasks/{id}/complete",
            patch(tasks::toggle_completion_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(axum::middleware::from_fn(middleware::logging::log_requests))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::enforce_rate_limit,
        ))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use todo_core::store::MemoryStore;
    use tower::ServiceExt;

    fn state_with_origins(origins: &[&str]) -> AppState {
        let mut config = ApiConfig::for_tests("lib-test-secret");
        config.cors_origins = origins.iter().map(|o| o.to_string()).collect();
        AppState::new(Arc::new(MemoryStore::new()), config)
    }

    #[test]
    fn wildcard_and_invalid_origins_are_dropped() {
        let _ = router(state_with_origins(&["*"]));
        let _ = router(state_with_origins(&["*", "http://localhost:3000", "bad\norigin"]));
    }

    #[tokio::test]
    async fn listed_origin_survives_a_wildcard_entry() {
        let app = router(state_with_origins(&["*", "http://localhost:3000"]));
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/tasks")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }
}
