//! Client firewall configuration.

use serde::{Deserialize, Serialize};

/// User-Agent based client firewall.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientFilterConfig {
    /// Enable the filter
    #[serde(rename = "Enable", default)]
    pub enable: bool,
    /// `BlackList` or `WhiteList` (case-insensitive); blank means blacklist
    #[serde(rename = "Mode", default)]
    pub mode: String,
    /// Substrings matched case-insensitively against the User-Agent
    #[serde(rename = "ClientList", default)]
    pub client_list: Vec<String>,
}
