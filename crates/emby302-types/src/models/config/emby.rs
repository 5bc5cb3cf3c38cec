//! Upstream Emby server configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upstream Emby server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct EmbyConfig {
    /// Base URL, e.g. `http://127.0.0.1:8096`
    #[serde(default)]
    #[validate(url)]
    pub host: String,
    /// Fallback API key used when the request carries none
    #[serde(default)]
    pub api_key: String,
    /// STRM path rewriting
    #[serde(default)]
    pub strm: StrmConfig,
    /// `"403"` blocks item downloads; anything else allows them. Blank means `"403"`.
    #[serde(rename = "download-strategy", default)]
    pub download_strategy: String,
}

/// STRM path rewriting rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrmConfig {
    /// Ordered `"<from> => <to>"` rules; the first rule whose `from` matches wins
    #[serde(rename = "path-map", default)]
    pub path_map: Vec<String>,
}
