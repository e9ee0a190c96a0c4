//! Application error types.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_core::auth::{AuthError, AuthFault};
use todo_core::store::StoreError;
use todo_core::tasks::TaskError;
use tracing::error;

use crate::models::{ErrorResponse, RateLimitResponse};

/// Body text for `429` responses.
pub const RATE_LIMIT_DETAIL: &str = "Rate limit exceeded. Please try again later.";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Token validation failed: {0}")]
    TokenValidation(String),

    #[error("Token expired: {0}")]
    TokenExpired(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Task {0} not found")]
    TaskNotFound(i64),

    #[error("User not found")]
    UserNotFound,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// HTTP status and wire error code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "HTTP_ERROR"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            AppError::InvalidCredentials(_) => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::TokenValidation(_) => (StatusCode::UNAUTHORIZED, "TOKEN_VALIDATION_ERROR"),
            AppError::TokenExpired(_) => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "INSUFFICIENT_PERMISSIONS"),
            AppError::TaskNotFound(_) => (StatusCode::NOT_FOUND, "TASK_NOT_FOUND"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(m)
            | AppError::Validation(m)
            | AppError::InvalidCredentials(m)
            | AppError::TokenValidation(m)
            | AppError::TokenExpired(m)
            | AppError::Forbidden(m) => m.clone(),
            AppError::TaskNotFound(id) => format!("Task with ID {id} not found"),
            AppError::UserNotFound => "User not found".into(),
            AppError::RateLimited => RATE_LIMIT_DETAIL.into(),
            AppError::Internal(_) => "Internal server error".into(),
        }
    }

    /// 401s carry a `WWW-Authenticate: Bearer` challenge.
    fn wants_bearer_challenge(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCredentials(_) | AppError::TokenValidation(_) | AppError::TokenExpired(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            error!("internal error: {detail}");
        }

        let (status, code) = self.status_and_code();
        if let AppError::RateLimited = self {
            let body = Json(RateLimitResponse {
                detail: RATE_LIMIT_DETAIL.to_string(),
            });
            return (status, body).into_response();
        }

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.client_message(),
        });
        let mut response = (status, body).into_response();
        if self.wants_bearer_challenge() {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AuthFault> for AppError {
    fn from(fault: AuthFault) -> Self {
        if fault.is_expired() {
            AppError::TokenExpired(fault.to_string())
        } else {
            AppError::TokenValidation(fault.to_string())
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => {
                AppError::InvalidCredentials("Incorrect email or password".into())
            }
            AuthError::TokenError(msg) => AppError::Internal(msg),
            AuthError::ValidationError(msg) => AppError::BadRequest(msg),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::BadRequest(msg),
            StoreError::DbError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<TaskError> for AppError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::NotFound(id) => AppError::TaskNotFound(id),
            TaskError::Validation(msg) => AppError::Validation(msg),
            TaskError::Store(e) => AppError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_faults_map_to_token_codes() {
        let (status, code) = AppError::from(AuthFault::Expired).status_and_code();
        assert_eq!((status, code), (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"));

        for fault in [
            AuthFault::MissingHeader,
            AuthFault::InvalidScheme,
            AuthFault::InvalidToken,
            AuthFault::MissingClaims,
        ] {
            let (status, code) = AppError::from(fault).status_and_code();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(code, "TOKEN_VALIDATION_ERROR");
        }
    }

    #[test]
    fn unauthorized_responses_carry_bearer_challenge() {
        let resp = AppError::TokenExpired("Token has expired".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[WWW_AUTHENTICATE], "Bearer");

        let resp = AppError::Forbidden("Insufficient permissions".into()).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn not_found_task_hides_ownership() {
        let err = AppError::from(TaskError::NotFound(4));
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "TASK_NOT_FOUND"));
        assert_eq!(err.client_message(), "Task with ID 4 not found");
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = AppError::Internal("connection refused to 10.0.0.5".into());
        assert_eq!(err.client_message(), "Internal server error");
    }
}
