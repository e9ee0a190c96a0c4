//! Bearer-token gate: `Authorization` header in, authenticated owner out.
//!
//! Framework-free so it can be unit tested; `todo_api::middleware::auth`
//! wraps it for axum.

use thiserror::Error;
use tracing::debug;

use super::jwt::Claims;
use super::validator::{VerificationOutcome, verify_token};

/// Scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Identity attached to a request once its token has been verified.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub claims: Claims,
}

/// Why a request was not authenticated. Never transient: no retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFault {
    #[error("No authorization header provided")]
    MissingHeader,

    #[error("Invalid authorization header format. Expected 'Bearer <token>'")]
    InvalidScheme,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid token payload: missing required claims")]
    MissingClaims,
}

impl AuthFault {
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthFault::Expired)
    }
}

/// Authenticate a raw `Authorization` header value.
pub fn authenticate(header: Option<&str>, secret: &[u8]) -> Result<AuthenticatedUser, AuthFault> {
    let header = header.ok_or(AuthFault::MissingHeader)?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthFault::InvalidScheme)?;

    match verify_token(token, secret) {
        VerificationOutcome::Valid(claims) => Ok(AuthenticatedUser {
            user_id: claims.user_id,
            claims,
        }),
        VerificationOutcome::Expired => Err(AuthFault::Expired),
        VerificationOutcome::MissingClaims => Err(AuthFault::MissingClaims),
        outcome @ (VerificationOutcome::SignatureInvalid | VerificationOutcome::Malformed) => {
            debug!(?outcome, "bearer token rejected");
            Err(AuthFault::InvalidToken)
        }
    }
}
