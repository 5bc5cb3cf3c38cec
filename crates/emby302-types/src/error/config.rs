//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading the config file. All of them abort startup.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Config file not found at expected path
    #[error("Config not found: {path}")]
    NotFound {
        /// Filesystem path where config was expected
        path: String,
    },

    /// Config file exists but could not be read
    #[error("Failed to read config {path}: {message}")]
    ReadError {
        /// Filesystem path of the config file
        path: String,
        /// Description of the IO failure
        message: String,
    },

    /// Config file parse error (YAML)
    #[error("Config parse error: {message}")]
    ParseError {
        /// Description of the parse failure
        message: String,
    },

    /// Config validation error (invalid values)
    #[error("Config validation error for {field}: {message}")]
    ValidationError {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::ValidationError`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError { field: field.into(), message: message.into() }
    }

    /// Create a read error from an IO error, mapping `NotFound` to its own variant.
    pub fn from_io_error(path: &str, e: &std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path: path.to_string() }
        } else {
            Self::ReadError { path: path.to_string(), message: e.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_error_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(
            ConfigError::from_io_error("/app/config.yml", &io),
            ConfigError::NotFound { path: "/app/config.yml".to_string() }
        );
    }

    #[test]
    fn test_from_io_error_other() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::from_io_error("/app/config.yml", &io);
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains("denied"));
    }
}
