//! Global request protection gate.
//!
//! Runs before route dispatch for every request, including `/health` and the
//! 404 fallback. The caller role comes from a verified identity token when
//! one is attached; everything else is `guest`.

mod engine;

pub use engine::{CallerRole, ProtectionEngine, RequestMeta, Verdict};

use axum::{
    extract::Request,
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

use crate::api::handlers::auth::{session, state::AuthConfig, token};

pub async fn protect(request: Request, next: Next) -> Response {
    let Some(engine) = request.extensions().get::<Arc<ProtectionEngine>>().cloned() else {
        error!("Protection engine extension is missing");
        return internal_error();
    };
    let Some(config) = request.extensions().get::<Arc<AuthConfig>>().cloned() else {
        error!("Auth config extension is missing");
        return internal_error();
    };

    let role = caller_role(request.headers(), &config);
    let meta = request_meta(&request);

    match engine.evaluate(role, &meta) {
        Verdict::Allowed => next.run(request).await,
        Verdict::Bot => {
            warn!(
                ip = meta.client_ip.as_deref().unwrap_or("unknown"),
                user_agent = meta.user_agent.as_deref().unwrap_or(""),
                path = %meta.path,
                "Bot request blocked !"
            );
            deny(StatusCode::FORBIDDEN, "Automated request are not allowed !")
        }
        Verdict::Shield => {
            warn!(
                ip = meta.client_ip.as_deref().unwrap_or("unknown"),
                user_agent = meta.user_agent.as_deref().unwrap_or(""),
                path = %meta.path,
                method = %meta.method,
                "Shield request blocked !"
            );
            deny(StatusCode::FORBIDDEN, "Request blocked by security policy !")
        }
        Verdict::RateLimited => {
            warn!(
                ip = meta.client_ip.as_deref().unwrap_or("unknown"),
                user_agent = meta.user_agent.as_deref().unwrap_or(""),
                path = %meta.path,
                bucket = %role.bucket_name(),
                "Rate limit exceeded !"
            );
            deny(
                StatusCode::TOO_MANY_REQUESTS,
                &format!("Too Many Requests !{}", role.limit_message()),
            )
        }
    }
}

/// Derive the caller role from a verified identity token; anything invalid
/// or absent is a guest.
fn caller_role(headers: &HeaderMap, config: &AuthConfig) -> CallerRole {
    session::extract_token(headers)
        .and_then(|raw| token::verify_token(config.token_secret(), &raw).ok())
        .map_or(CallerRole::Guest, |claims| CallerRole::from(claims.role))
}

fn request_meta(request: &Request) -> RequestMeta {
    RequestMeta {
        client_ip: extract_client_ip(request.headers()),
        user_agent: request
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
    }
}

/// Extract a client IP from common proxy headers.
fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn deny(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"error": "Forbidden", "message": message})),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Internal server error", "message": "something went wrong !"})),
    )
        .into_response()
}
