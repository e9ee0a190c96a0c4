//! API server configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use todo_core::auth::jwt::ACCESS_TOKEN_EXPIRY_MINUTES;
use todo_core::ratelimit::RateLimitConfig;
use tracing::{info, warn};

/// Origins allowed by CORS when `CORS_ORIGINS` is unset.
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://localhost:3001,http://localhost:3002";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    pub access_token_ttl_minutes: i64,
    /// Per-client request limits.
    pub rate_limit: RateLimitConfig,
    /// Origins allowed to call the API from a browser.
    pub cors_origins: Vec<String>,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                      | Default                          |
    /// |-------------------------------|----------------------------------|
    /// | `BIND_ADDR`                   | `0.0.0.0:8000`                   |
    /// | `DATABASE_URL`                | `postgres://localhost:5432/todo` |
    /// | `JWT_SECRET` / `BETTER_AUTH_SECRET` | generated & persisted to file |
    /// | `ACCESS_TOKEN_EXPIRE_MINUTES` | `30`                             |
    /// | `RATE_LIMIT_PER_MINUTE`       | `10`                             |
    /// | `AUTH_RATE_LIMIT_PER_MINUTE`  | `5`                              |
    /// | `CORS_ORIGINS`                | localhost:3000-3002              |
    pub fn from_env() -> Self {
        let defaults = RateLimitConfig::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/todo".into()),
            jwt_secret: resolve_jwt_secret(),
            access_token_ttl_minutes: env_or(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                ACCESS_TOKEN_EXPIRY_MINUTES,
            ),
            rate_limit: RateLimitConfig {
                requests_per_window: env_or(
                    "RATE_LIMIT_PER_MINUTE",
                    defaults.requests_per_window,
                ),
                auth_requests_per_window: env_or(
                    "AUTH_RATE_LIMIT_PER_MINUTE",
                    defaults.auth_requests_per_window,
                ),
                window: Duration::from_secs(60),
            },
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
        }
    }

    /// Fixed configuration for tests: known secret, default limits.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".into(),
            database_url: String::new(),
            jwt_secret: jwt_secret.into(),
            access_token_ttl_minutes: ACCESS_TOKEN_EXPIRY_MINUTES,
            rate_limit: RateLimitConfig::default(),
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
        }
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }
}

/// Read and parse an env var, falling back to `default` when unset or invalid.
fn env_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, %default, "unparseable config value, using default");
            default
        }),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Resolve the JWT secret: env var `JWT_SECRET`, then `BETTER_AUTH_SECRET`, then a persisted file.
pub fn resolve_jwt_secret() -> String {
    for key in ["JWT_SECRET", "BETTER_AUTH_SECRET"] {
        if let Ok(secret) = std::env::var(key)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    // Generate and persist
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = std::fs::write(&secret_path, &secret) {
        warn!(path = %secret_path.display(), "could not persist JWT secret: {e}");
    } else {
        info!(path = %secret_path.display(), "generated new JWT secret");
    }
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todo")
        .join("jwt-secret")
}
