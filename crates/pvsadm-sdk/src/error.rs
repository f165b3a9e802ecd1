//! Error types for the pvsadm SDK

use crate::auth::AuthError;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the IBM Cloud clients and workflows
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Token exchange failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Authentication error (expired/invalid token)
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Authorization error
    #[error("Authorization error: {message}")]
    Authorization { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Not found
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Bad request with message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Request could not be built from the given input
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Response body could not be decoded
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// Any other unsuccessful response
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("failed to find the COS instance for the bucket mentioned: {bucket}")]
    BucketNotFound { bucket: String },

    #[error("failed to find the object {object} in {bucket} bucket")]
    ObjectNotFound { object: String, bucket: String },

    #[error("failed to list the service credentials: {message}")]
    ServiceCredentials { message: String },

    #[error("service credential {name} does not carry HMAC keys")]
    CredentialsMissing { name: String },

    #[error("failed to find the PowerVS instance: {instance}")]
    InstanceNotFound { instance: String },

    #[error("failed to initiate the import job")]
    ImportNotInitiated,

    #[error("invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Error body shapes returned by IBM Cloud services.
///
/// Resource Controller answers with `message`, IAM with `errorMessage`,
/// PowerVS with `description`/`error`; all fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Most specific message available in the body
    pub fn best_message(&self) -> Option<String> {
        self.description
            .clone()
            .or_else(|| self.error_message.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.errors.iter().find_map(|e| e.message.clone()))
            .or_else(|| self.error.clone())
            .filter(|m| !m.is_empty())
    }
}
