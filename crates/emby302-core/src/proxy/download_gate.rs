//! Download policy gate.

use std::fmt;

/// Config value that blocks item downloads.
pub const BLOCK_DOWNLOADS: &str = "403";

const ITEMS_MARKER: &str = "/Items/";
const DOWNLOAD_MARKER: &str = "/Download";

/// Download strategy from `emby.download-strategy`.
///
/// Only the literal `"403"` blocks. Every other value is kept verbatim and allows downloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DownloadPolicy {
    #[default]
    Block,
    Allow(String),
}

impl fmt::Display for DownloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => write!(f, "{}", BLOCK_DOWNLOADS),
            Self::Allow(raw) => write!(f, "{}", raw),
        }
    }
}

impl DownloadPolicy {
    /// Blank means the blocking default. Otherwise the value is compared verbatim, so `" 403 "`
    /// allows downloads.
    pub fn from_config(raw: &str) -> Self {
        if raw.trim().is_empty() || raw == BLOCK_DOWNLOADS {
            Self::Block
        } else {
            Self::Allow(raw.to_string())
        }
    }

    /// Whether a request for `path` must be rejected with 403.
    pub fn blocks(&self, path: &str) -> bool {
        matches!(self, Self::Block) && is_download_path(path)
    }
}

/// Emby item download endpoints look like `/emby/Items/<id>/Download`. Case-sensitive.
pub fn is_download_path(path: &str) -> bool {
    path.contains(ITEMS_MARKER) && path.contains(DOWNLOAD_MARKER)
}
