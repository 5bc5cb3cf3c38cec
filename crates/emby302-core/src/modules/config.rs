//! Config file loading.
//!
//! The YAML file is read once at startup and turned into an immutable [`Settings`]. Nothing in
//! the request path reads the file or any global afterwards.

use std::fs;
use std::path::Path;
use std::time::Duration;

use emby302_types::error::ConfigError;
use emby302_types::models::AppConfig;
use validator::Validate;

use crate::proxy::client_filter::ClientFilter;
use crate::proxy::download_gate::DownloadPolicy;
use crate::proxy::rules::RuleStore;

pub const DEFAULT_CONFIG_PATH: &str = "/app/config.yml";

/// Per-call timeout for PlaybackInfo lookups.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Upstream Emby server as seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbyConnection {
    pub host: String,
    pub api_key: String,
    pub timeout: Duration,
    pub download_policy: DownloadPolicy,
}

/// Effective, validated settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub listen_host: String,
    pub port: u16,
    pub emby: EmbyConnection,
    pub rules: RuleStore,
    pub client_filter: ClientFilter,
}

impl Settings {
    /// Validate a parsed config file.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let port = match config.server.port.as_ref() {
            None => return Err(ConfigError::validation("server.port", "must not be empty")),
            Some(p) if p.is_blank() => {
                return Err(ConfigError::validation("server.port", "must not be empty"))
            },
            Some(p) => p.to_port().ok_or_else(|| {
                ConfigError::validation("server.port", "must be a port number between 1 and 65535")
            })?,
        };

        let host = config.emby.host.trim();
        if host.is_empty() {
            return Err(ConfigError::validation("emby.host", "must not be empty"));
        }
        config
            .validate()
            .map_err(|e| ConfigError::validation("emby.host", e.to_string()))?;

        let client_filter = ClientFilter::from_config(config.client_filter.as_ref())?;

        Ok(Self {
            listen_host: config.server.host.trim().to_string(),
            port,
            emby: EmbyConnection {
                host: host.to_string(),
                api_key: config.emby.api_key.clone(),
                timeout: UPSTREAM_TIMEOUT,
                download_policy: DownloadPolicy::from_config(&config.emby.download_strategy),
            },
            rules: RuleStore::from_config(&config.emby.strm.path_map),
            client_filter,
        })
    }
}

/// Read and parse the config file without validating it.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::from_io_error(&display, &e))?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError { message: e.to_string() })
}

/// Read, parse and validate the config file.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let config = read_config(path)?;
    Settings::from_config(&config)
}
