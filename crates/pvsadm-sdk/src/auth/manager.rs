//! IAM token management with caching
//!
//! The TokenManager exchanges the API key for a bearer token and keeps it
//! cached until it is about to expire.

use super::types::{AuthError, AuthResult, IamTokenResponse, TokenSet};
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Manages IAM tokens for a single API key
pub struct TokenManager {
    api_key: String,
    token_endpoint: String,
    http_client: reqwest::Client,
    cache: RwLock<Option<TokenSet>>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_endpoint", &self.token_endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl TokenManager {
    /// Re-request the token when it expires within this window
    const REFRESH_THRESHOLD: Duration = Duration::from_secs(60);

    /// Create a token manager for `api_key` against the IAM service at `iam_url`
    pub fn new(
        api_key: impl Into<String>,
        iam_url: &str,
        http_client: reqwest::Client,
    ) -> AuthResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AuthError::ApiKeyMissing);
        }

        Ok(Self {
            api_key,
            token_endpoint: format!("{}/identity/token", iam_url.trim_end_matches('/')),
            http_client,
            cache: RwLock::new(None),
        })
    }

    /// Get a valid access token, exchanging the API key when needed
    pub async fn get_access_token(&self) -> AuthResult<String> {
        {
            let cache = self.cache.read().await;
            if let Some(token_set) = cache.as_ref() {
                if !token_set.expires_within(Self::REFRESH_THRESHOLD) {
                    debug!("Using cached IAM token");
                    return Ok(token_set.access_token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // another task may have refreshed while we waited for the lock
        if let Some(token_set) = cache.as_ref() {
            if !token_set.expires_within(Self::REFRESH_THRESHOLD) {
                return Ok(token_set.access_token.clone());
            }
        }

        let token_set = self.request_token().await?;
        let access_token = token_set.access_token.clone();
        *cache = Some(token_set);
        Ok(access_token)
    }

    async fn request_token(&self) -> AuthResult<TokenSet> {
        debug!("Requesting IAM token from {}", self.token_endpoint);

        let response = self
            .http_client
            .post(&self.token_endpoint)
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", APIKEY_GRANT_TYPE),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(format!("IAM token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<crate::error::ErrorResponse>(&error_text)
                .ok()
                .and_then(|body| body.best_message())
                .unwrap_or(error_text);
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let token_response: IamTokenResponse = response.json().await.map_err(|e| {
            AuthError::InvalidResponse(format!("Failed to parse token response: {}", e))
        })?;

        info!("Obtained IAM access token");
        Ok(token_response.into())
    }
}
