//! User-Agent based client firewall.

use std::collections::BTreeSet;

use emby302_types::error::ConfigError;
use emby302_types::models::{ClientFilterConfig, ClientFilterMode};
use tracing::info;

/// Admission decision over the request's `User-Agent`.
///
/// Patterns are lowercase substrings; membership order is irrelevant so a set is fine here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    enabled: bool,
    mode: ClientFilterMode,
    patterns: BTreeSet<String>,
}

impl ClientFilter {
    pub fn new<I, S>(enabled: bool, mode: ClientFilterMode, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { enabled, mode, patterns }
    }

    /// A filter that admits everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build from the `ClientFilter` config block. An absent block disables filtering; the mode
    /// is only validated when the filter is enabled.
    pub fn from_config(config: Option<&ClientFilterConfig>) -> Result<Self, ConfigError> {
        let Some(config) = config.filter(|c| c.enable) else {
            return Ok(Self::disabled());
        };

        let mode = ClientFilterMode::parse(&config.mode).ok_or_else(|| {
            ConfigError::validation("ClientFilter.Mode", "must be 'BlackList' or 'WhiteList'")
        })?;

        let filter = Self::new(true, mode, &config.client_list);
        for pattern in &filter.patterns {
            info!("Loaded client filter entry ({}): {}", mode, pattern);
        }
        Ok(filter)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> ClientFilterMode {
        self.mode
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Whether a request with this `User-Agent` must be rejected.
    pub fn should_block(&self, user_agent: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let matched = self.matches(user_agent);
        match self.mode {
            ClientFilterMode::Blacklist => matched,
            ClientFilterMode::Whitelist => !matched,
        }
    }

    fn matches(&self, user_agent: &str) -> bool {
        let user_agent = user_agent.to_lowercase();
        self.patterns.iter().any(|p| user_agent.contains(p.as_str()))
    }
}
