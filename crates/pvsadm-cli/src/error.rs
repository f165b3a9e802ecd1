//! Error types for pvsadm

use thiserror::Error;

/// CLI error type with minimal variants
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file issues
    #[error("Configuration error: {0}")]
    Config(#[from] pvsadm_common::ConfigurationError),

    /// IBM Cloud API and workflow errors
    #[error(transparent)]
    Api(#[from] pvsadm_sdk::ApiError),

    /// Invalid flag combinations or values
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Terminal prompt failures
    #[error("Interactive prompt failed: {0}")]
    Interactive(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn interactive(message: impl Into<String>) -> Self {
        Self::Interactive(message.into())
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_is_transparent() {
        let err: CliError = pvsadm_sdk::ApiError::BucketNotFound {
            bucket: "images".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "failed to find the COS instance for the bucket mentioned: images"
        );
    }

    #[test]
    fn test_serialization_error_converts() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CliError = source.into();
        assert!(matches!(err, CliError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error: "));
    }
}
