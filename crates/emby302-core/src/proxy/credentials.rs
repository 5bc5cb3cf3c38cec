//! API key selection for the upstream PlaybackInfo call.

use axum::http::HeaderMap;
use regex::Regex;
use std::sync::OnceLock;

use crate::proxy::common::header_constants::{
    QUERY_API_KEY, QUERY_EMBY_TOKEN, X_EMBY_AUTHORIZATION,
};
use crate::proxy::common::query;

static AUTH_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used, reason = "static pattern, covered by tests")]
fn auth_token_regex() -> &'static Regex {
    AUTH_TOKEN_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)token="([^"]+)""#).expect("Auth token regex is valid")
    })
}

/// Pull `Token="..."` out of an `X-Emby-Authorization` value.
pub fn token_from_authorization(value: &str) -> Option<&str> {
    auth_token_regex().captures(value).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Pick the credential for the upstream call.
///
/// Precedence: `api_key` query, `X-Emby-Token` query, `Token` inside `X-Emby-Authorization`,
/// then `fallback_key`. May return an empty string; the resolver rejects that.
pub fn extract_api_key(query: Option<&str>, headers: &HeaderMap, fallback_key: &str) -> String {
    if let Some(key) = query::non_empty(query, QUERY_API_KEY) {
        return key;
    }
    if let Some(key) = query::non_empty(query, QUERY_EMBY_TOKEN) {
        return key;
    }
    if let Some(token) = headers
        .get(X_EMBY_AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(token_from_authorization)
    {
        return token.to_string();
    }
    fallback_key.to_string()
}
