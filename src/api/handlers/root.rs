//! Root greeting and API status handlers.

use axum::{response::IntoResponse, Json};

use super::auth::types::ApiMessage;

// Undocumented on purpose, like other out-of-API routes.
pub async fn root() -> impl IntoResponse {
    "Hello from WrapJet-Prod-Scale-API ✨"
}

#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "API status message", body = ApiMessage)
    ),
    tag = "status"
)]
pub async fn api_status() -> impl IntoResponse {
    Json(ApiMessage {
        message: "WrapJet-Prod-Scale-API is running !!".to_string(),
    })
}
