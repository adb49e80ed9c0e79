//! Liveness handler. Never touches the store.

use axum::{
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use chrono::{SecondsFormat, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use utoipa::ToSchema;

use crate::GIT_COMMIT_HASH;

static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Pin the uptime origin to process startup instead of the first request.
pub(crate) fn init_uptime() {
    Lazy::force(&SERVER_START);
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    status: String,
    timestamp: String,
    uptime: f64,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is alive", body = Health)
    ),
    tag = "status"
)]
pub async fn health() -> impl IntoResponse {
    let health = Health {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: SERVER_START.elapsed().as_secs_f64(),
    };

    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        &GIT_COMMIT_HASH[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )
    .parse::<HeaderValue>()
    {
        headers.insert("X-App", value);
    }

    (headers, Json(health))
}
