//! Configuration enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the client filter interprets its pattern list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientFilterMode {
    /// Block clients matching any pattern
    #[default]
    Blacklist,
    /// Block clients matching no pattern
    Whitelist,
}

impl fmt::Display for ClientFilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Blacklist => write!(f, "blacklist"),
            Self::Whitelist => write!(f, "whitelist"),
        }
    }
}

impl ClientFilterMode {
    /// Parse a configured mode. Trims and ignores case; blank means blacklist.
    /// Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "blacklist" => Some(Self::Blacklist),
            "whitelist" => Some(Self::Whitelist),
            _ => None,
        }
    }
}
