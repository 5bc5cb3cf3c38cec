//! Top-level configuration file.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::client_filter::ClientFilterConfig;
use super::emby::EmbyConfig;

/// Full configuration file.
///
/// Key names follow the file format users already deploy (`ClientFilter` is PascalCase,
/// `download-strategy` and `path-map` are kebab-case).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct AppConfig {
    /// Listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream Emby server
    #[serde(default)]
    #[validate(nested)]
    pub emby: EmbyConfig,
    /// Client firewall; absent means disabled
    #[serde(rename = "ClientFilter", default, skip_serializing_if = "Option::is_none")]
    pub client_filter: Option<ClientFilterConfig>,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on, written either as a number or a quoted string
    #[serde(default)]
    pub port: Option<PortValue>,
    /// Bind address
    #[serde(default = "default_listen_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: None, host: default_listen_host() }
    }
}

/// A port as it appears in YAML: `port: 8095` or `port: "8095"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    /// True when the port was written as an empty or whitespace-only string.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    /// Numeric port, `None` if the text is not a valid non-zero port.
    pub fn to_port(&self) -> Option<u16> {
        let port = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        (port != 0).then_some(port)
    }
}

pub fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}
