//! Identity cookie helpers.

use axum::http::{
    header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};

use super::state::AuthConfig;

pub(crate) const TOKEN_COOKIE_NAME: &str = "wrapjet_token";

/// Build a `HttpOnly` cookie carrying the identity token.
pub(super) fn auth_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.token_ttl_seconds();
    let secure = config.cookie_secure();
    let mut cookie = format!(
        "{TOKEN_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={ttl_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Expire the identity cookie immediately.
pub(super) fn clear_auth_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure = config.cookie_secure();
    let mut cookie = format!("{TOKEN_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Pull the identity token from the cookie, falling back to a bearer header.
pub(crate) fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == TOKEN_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use secrecy::SecretString;

    fn config(frontend: &str) -> AuthConfig {
        AuthConfig::new(
            frontend.to_string(),
            SecretString::from("not-a-real-secret".to_string()),
        )
        .with_token_ttl_seconds(900)
    }

    #[test]
    fn auth_cookie_sets_expected_attributes() -> Result<()> {
        let cookie = auth_cookie(&config("http://localhost:5173"), "token-value")?;
        let rendered = cookie.to_str()?;
        assert_eq!(
            rendered,
            "wrapjet_token=token-value; Path=/; HttpOnly; SameSite=Strict; Max-Age=900"
        );
        Ok(())
    }

    #[test]
    fn auth_cookie_is_secure_for_https_frontends() -> Result<()> {
        let cookie = auth_cookie(&config("https://app.wrapjet.dev"), "token-value")?;
        assert!(cookie.to_str()?.ends_with("; Secure"));
        Ok(())
    }

    #[test]
    fn clear_cookie_expires_immediately() -> Result<()> {
        let cookie = clear_auth_cookie(&config("http://localhost:5173"))?;
        let rendered = cookie.to_str()?;
        assert!(rendered.starts_with("wrapjet_token=;"));
        assert!(rendered.contains("Max-Age=0"));
        Ok(())
    }

    #[test]
    fn extract_token_reads_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; wrapjet_token=abc123; lang=en"),
        );
        assert_eq!(extract_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_token_falls_back_to_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_token_none_when_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_token(&headers), None);
    }
}
