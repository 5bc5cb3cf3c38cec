//! Header and query parameter names from the Emby API.

/// Header carrying `MediaBrowser Client="...", ..., Token="..."`.
pub const X_EMBY_AUTHORIZATION: &str = "X-Emby-Authorization";

/// Query parameter carrying the API key.
pub const QUERY_API_KEY: &str = "api_key";
/// Query parameter carrying a session token.
pub const QUERY_EMBY_TOKEN: &str = "X-Emby-Token";
/// Query parameter selecting the media source of a playback request.
pub const QUERY_MEDIA_SOURCE_ID: &str = "MediaSourceId";
/// Lower camel-case spelling sent by some clients.
pub const QUERY_MEDIA_SOURCE_ID_ALT: &str = "mediaSourceId";

/// Hop-by-hop headers, never forwarded in either direction.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];
