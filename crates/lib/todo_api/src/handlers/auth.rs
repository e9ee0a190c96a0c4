//! Authentication request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse, UserResponse};
use crate::services::auth;

/// `POST /auth/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(
        state.store.as_ref(),
        &body.email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
        state.config.access_token_ttl(),
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /auth/register`: create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = auth::register(state.store.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `POST /auth/logout`: tokens are stateless; the client discards its copy.
pub async fn logout_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out successfully. Please discard your token on the client-side."
            .into(),
    })
}

/// `GET /auth/me`: profile of the authenticated user.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> AppResult<Json<UserResponse>> {
    let user = auth::current_user(state.store.as_ref(), caller.user_id).await?;
    Ok(Json(user.into()))
}
