//! Authentication and authorization logic.
//!
//! Provides password hashing, JWT encoding/decoding, token validation and the
//! bearer-token gate that can be shared by `todo_api` and any other frontend.

pub mod gate;
pub mod jwt;
pub mod password;
pub mod validator;

use thiserror::Error;

pub use gate::{AuthFault, AuthenticatedUser, authenticate};
pub use jwt::{Claims, DecodeError, RawClaims};
pub use validator::{VerificationOutcome, verify_token, verify_token_at};

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
