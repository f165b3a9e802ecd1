//! Error types shared across pvsadm components

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to determine base directories: {0}")]
    BaseDirectories(String),
}
