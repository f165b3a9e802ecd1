//! Authentication-related types

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// IAM token set returned by the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Access token for API requests
    pub access_token: String,
    /// Optional refresh token
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token expiration time as Unix timestamp
    #[serde(default)]
    pub expires_at: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Raw response of `POST /identity/token`
#[derive(Debug, Deserialize)]
pub(crate) struct IamTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Absolute expiry as Unix timestamp
    #[serde(default)]
    pub expiration: Option<u64>,
}

impl From<IamTokenResponse> for TokenSet {
    fn from(response: IamTokenResponse) -> Self {
        let expires_at = response
            .expiration
            .or_else(|| response.expires_in.map(|secs| now_secs().saturating_add(secs)));

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            expires_at,
        }
    }
}

impl TokenSet {
    /// Check if the token expires within the specified duration
    pub fn expires_within(&self, duration: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now_secs().saturating_add(duration.as_secs()),
            None => false,
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No API key was configured
    #[error("IBM Cloud API key is missing. Set IBMCLOUD_API_KEY or pass --api-key")]
    ApiKeyMissing,

    /// Network error during token exchange
    #[error("Network error: {0}")]
    NetworkError(String),

    /// IAM rejected the API key
    #[error("IAM token request failed with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Invalid token response
    #[error("Invalid IAM response: {0}")]
    InvalidResponse(String),
}
