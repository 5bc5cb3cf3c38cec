//! Media path resolution errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the PlaybackInfo lookup against the upstream Emby server.
///
/// None of these are retried; the dispatcher answers the client immediately.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ResolveError {
    /// No API key in the request and none configured; the upstream is never contacted
    #[error("API key is empty, refusing to query Emby")]
    CredentialMissing,

    /// Transport failure or per-call timeout
    #[error("Emby API request failed: {message}")]
    UpstreamUnreachable { message: String },

    /// Upstream answered 401
    #[error("Emby API authentication failed (401 Unauthorized), check that the API key is valid")]
    UpstreamUnauthorized,

    /// Upstream answered anything else that is not 200
    #[error("Emby API returned non-200 status: {status}")]
    UpstreamBadStatus { status: u16 },

    /// Body was not a PlaybackInfo document
    #[error("Failed to decode Emby API response: {message}")]
    UpstreamMalformedResponse { message: String },

    /// PlaybackInfo listed no media sources
    #[error("No media sources (MediaSources) found")]
    NoMediaSource,
}

impl ResolveError {
    /// Short machine-readable name, used as a tracing field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CredentialMissing => "credential_missing",
            Self::UpstreamUnreachable { .. } => "upstream_unreachable",
            Self::UpstreamUnauthorized => "upstream_unauthorized",
            Self::UpstreamBadStatus { .. } => "upstream_bad_status",
            Self::UpstreamMalformedResponse { .. } => "upstream_malformed_response",
            Self::NoMediaSource => "no_media_source",
        }
    }

    /// HTTP status the dispatcher answers with. Every resolver failure is a 500.
    pub fn http_status_code(&self) -> u16 {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(ResolveError::CredentialMissing.http_status_code(), 500);
        assert_eq!(ResolveError::UpstreamBadStatus { status: 404 }.http_status_code(), 500);
    }

    #[test]
    fn test_unauthorized_message_mentions_401() {
        let msg = ResolveError::UpstreamUnauthorized.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Unauthorized"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ResolveError::NoMediaSource.kind(), "no_media_source");
        assert_eq!(
            ResolveError::UpstreamUnreachable { message: "timeout".to_string() }.kind(),
            "upstream_unreachable"
        );
    }
}
