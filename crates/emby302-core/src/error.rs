//! Unified error types for emby302 core.

use emby302_types::error::ConfigError;
use serde::Serialize;
use thiserror::Error;

/// Startup-time errors. Per-request failures use [`emby302_types::ResolveError`] instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The upstream host is not a usable base URL.
    #[error("Invalid Emby host: {0}")]
    InvalidHost(#[from] url::ParseError),

    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for emby302 core operations.
pub type AppResult<T> = Result<T, AppError>;
