//! PlaybackInfo lookup: asks Emby where a media source actually lives.

use emby302_types::error::ResolveError;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::proxy::common::header_constants::{QUERY_API_KEY, QUERY_MEDIA_SOURCE_ID};

#[derive(Debug, Deserialize)]
struct PlaybackInfoResponse {
    #[serde(rename = "MediaSources", default)]
    media_sources: Option<Vec<MediaSourceInfo>>,
}

/// One media source entry as reported by Emby.
///
/// Remote and live sources come back with `"Path": null`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MediaSourceInfo {
    #[serde(rename = "Path", default)]
    pub path: Option<String>,
}

/// Resolves `(item, media source)` pairs to the storage path Emby reports.
///
/// Nothing is cached; every call hits the upstream once. The future is dropped together with
/// the inbound request, which aborts the outbound call.
#[derive(Clone)]
pub struct MediaPathResolver {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl MediaPathResolver {
    /// `client` must already carry the per-call timeout; `timeout` is only used in messages.
    pub fn new(client: reqwest::Client, host: &str, timeout: Duration) -> Self {
        Self { client, base_url: host.trim_end_matches('/').to_string(), timeout }
    }

    pub fn playback_info_url(&self, item_id: &str) -> String {
        format!("{}/emby/Items/{}/PlaybackInfo", self.base_url, item_id)
    }

    /// Path of the first media source of `item_id` / `media_source_id`.
    pub async fn resolve(
        &self,
        item_id: &str,
        media_source_id: &str,
        api_key: &str,
    ) -> Result<String, ResolveError> {
        if api_key.is_empty() {
            return Err(ResolveError::CredentialMissing);
        }

        let response = self
            .client
            .get(self.playback_info_url(item_id))
            .query(&[(QUERY_MEDIA_SOURCE_ID, media_source_id), (QUERY_API_KEY, api_key)])
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        match response.status() {
            StatusCode::OK => {},
            StatusCode::UNAUTHORIZED => return Err(ResolveError::UpstreamUnauthorized),
            status => return Err(ResolveError::UpstreamBadStatus { status: status.as_u16() }),
        }

        let body = response.bytes().await.map_err(|e| self.unreachable(e))?;
        let info: PlaybackInfoResponse = serde_json::from_slice(&body)
            .map_err(|e| ResolveError::UpstreamMalformedResponse { message: e.to_string() })?;

        info.media_sources
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|source| source.path.unwrap_or_default())
            .ok_or(ResolveError::NoMediaSource)
    }

    // The request URL carries the API key, so it is stripped before the error is surfaced.
    fn unreachable(&self, e: reqwest::Error) -> ResolveError {
        let message = if e.is_timeout() {
            format!("timed out after {:?}", self.timeout)
        } else {
            e.without_url().to_string()
        };
        ResolveError::UpstreamUnreachable { message }
    }
}
