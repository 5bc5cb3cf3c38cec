//! Per-request decision pipeline.
//!
//! ```text
//! admission ─403─▶  download gate ─403─▶  playback? ─no─┐
//!                                            │ yes       │
//!                                   MediaSourceId? ─no───┤
//!                                            │ yes       │
//!                           credentials → PlaybackInfo ─err─▶ 500
//!                                            │            │
//!                                      path map ─changed─▶ 302
//!                                            │ unchanged  │
//!                                            └────────────┴──▶ passthrough
//! ```

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use emby302_types::error::ResolveError;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::net::SocketAddr;
use tracing::{debug, error, info};

use crate::proxy::common::header_constants::{QUERY_MEDIA_SOURCE_ID, QUERY_MEDIA_SOURCE_ID_ALT};
use crate::proxy::common::query;
use crate::proxy::credentials::extract_api_key;
use crate::proxy::server::AppState;

const PLAYBACK_MARKER: &str = "/videos/";

/// Printable ASCII stays as-is; the mapped URL is already URL-shaped.
const LOCATION_ESCAPE: &AsciiSet = CONTROLS;

/// Terminal outcome of the pipeline for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Client filter rejected the User-Agent
    ClientBlocked,
    /// Download policy rejected the path
    DownloadBlocked,
    /// PlaybackInfo lookup failed
    ResolveFailed(ResolveError),
    /// A rule rewrote the media path
    Redirect(String),
    /// Hand the untouched request to the reverse proxy
    Passthrough,
}

/// Catch-all handler: every method and path enters here.
pub async fn handle_request(State(state): State<AppState>, request: Request) -> Response {
    let decision = decide(&state, request.uri(), request.headers()).await;
    match decision {
        Decision::Passthrough => {
            let peer = request.extensions().get::<ConnectInfo<SocketAddr>>().map(|info| info.0);
            state.passthrough.forward(request, peer).await
        },
        other => other.into_response(),
    }
}

/// Run the pipeline up to (not including) the passthrough.
pub async fn decide(state: &AppState, uri: &Uri, headers: &HeaderMap) -> Decision {
    let settings = &state.settings;
    let path = uri.path();

    let user_agent = headers
        .get(header::USER_AGENT)
        .map(|h| String::from_utf8_lossy(h.as_bytes()).into_owned())
        .unwrap_or_default();
    if settings.client_filter.should_block(&user_agent) {
        info!("Client User-Agent '{}' rejected by client filter", user_agent);
        return Decision::ClientBlocked;
    }

    if settings.emby.download_policy.blocks(path) {
        info!("Blocked download request: {}", path);
        return Decision::DownloadBlocked;
    }

    if !is_playback_path(path) {
        return Decision::Passthrough;
    }

    let Some(media_source_id) = query::non_empty(uri.query(), QUERY_MEDIA_SOURCE_ID)
        .or_else(|| query::non_empty(uri.query(), QUERY_MEDIA_SOURCE_ID_ALT))
    else {
        return Decision::Passthrough;
    };

    let item_id = item_id_from_path(path);
    let api_key = extract_api_key(uri.query(), headers, &settings.emby.api_key);

    let media_path = match state.resolver.resolve(item_id, &media_source_id, &api_key).await {
        Ok(media_path) => media_path,
        Err(e) => {
            error!(kind = e.kind(), item_id, "Failed to get Emby media path: {}", e);
            return Decision::ResolveFailed(e);
        },
    };
    info!("Resolved Emby media path: {}", media_path);

    let target = settings.rules.map(&media_path);
    if target == media_path {
        debug!("No path-map rule matched {}, passing through", media_path);
        return Decision::Passthrough;
    }

    info!("Path-map rule matched, redirecting to: {}", target);
    Decision::Redirect(target)
}

impl IntoResponse for Decision {
    fn into_response(self) -> Response {
        match self {
            Self::ClientBlocked => {
                (StatusCode::FORBIDDEN, "This client is not allowed to access the server")
                    .into_response()
            },
            Self::DownloadBlocked => {
                (StatusCode::FORBIDDEN, "Downloads are disabled by policy").into_response()
            },
            Self::ResolveFailed(e) => {
                let status = StatusCode::from_u16(e.http_status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, format!("Failed to get media info: {}", e)).into_response()
            },
            Self::Redirect(target) => match HeaderValue::from_str(&escape_non_ascii(&target)) {
                Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
                Err(_) => {
                    error!("Mapped URL is not a valid Location header: {:?}", target);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Mapped URL is not a valid redirect target")
                        .into_response()
                },
            },
            // Only reachable when a caller renders a decision without a proxy at hand.
            Self::Passthrough => StatusCode::BAD_GATEWAY.into_response(),
        }
    }
}

/// Playback endpoints contain `/Videos/` (any ASCII case).
pub fn is_playback_path(path: &str) -> bool {
    path.to_ascii_lowercase().contains(PLAYBACK_MARKER)
}

/// Second-to-last `/`-separated segment, e.g. `123` in `/emby/Videos/123/stream.mkv`.
pub fn item_id_from_path(path: &str) -> &str {
    path.rsplit('/').nth(1).unwrap_or_default()
}

/// Percent-escape bytes outside ASCII (and ASCII controls) so CJK file names survive in
/// `Location`.
pub fn escape_non_ascii(url: &str) -> String {
    utf8_percent_encode(url, LOCATION_ESCAPE).to_string()
}
