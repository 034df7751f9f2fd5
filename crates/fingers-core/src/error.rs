//! Error types for fingers-core.
//!
//! Input handling is infallible by contract; only configuration can fail.

use thiserror::Error;

/// Errors produced while loading or validating gesture configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML document could not be parsed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON document could not be parsed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// An option value is outside its valid range.
    #[error("invalid {gesture} option `{option}`: {reason}")]
    InvalidOption {
        gesture: &'static str,
        option: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(gesture: &'static str, option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            gesture,
            option,
            reason: reason.into(),
        }
    }
}

/// Result alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
