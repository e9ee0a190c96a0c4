//! Service root.

use axum::Json;

use crate::models::MessageResponse;

/// `GET /`: welcome banner, doubles as a liveness probe.
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Todo Backend API".into(),
    })
}
