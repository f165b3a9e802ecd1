//! HTTP client shared by all IBM Cloud service clients
//!
//! [`IbmCloudClient`] owns the connection pool, the endpoint table and the
//! IAM [`TokenManager`]. Service clients borrow it to build requests, so a
//! single token exchange serves every call of a command.
//!
//! ```rust,no_run
//! use pvsadm_sdk::ClientBuilder;
//!
//! # async fn example() -> pvsadm_sdk::Result<()> {
//! let client = ClientBuilder::default()
//!     .api_key("my-ibmcloud-api-key")
//!     .build()?;
//!
//! let instances = client
//!     .resource_controller()
//!     .list_resource_instances("service_instance")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    auth::TokenManager,
    cos::CosClient,
    endpoints::Endpoints,
    error::{ApiError, ErrorResponse, Result},
    power::{ImageClient, InstanceSelector},
    resource_controller::ResourceControllerClient,
    types::ResourceInstance,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default timeout in seconds for API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Authenticated client for the IBM Cloud APIs
#[derive(Debug, Clone)]
pub struct IbmCloudClient {
    http_client: reqwest::Client,
    endpoints: Arc<Endpoints>,
    token_manager: Arc<TokenManager>,
}

impl IbmCloudClient {
    /// Endpoint table in use
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // ===== Service clients =====

    /// Resource Controller v2 client
    pub fn resource_controller(&self) -> ResourceControllerClient {
        ResourceControllerClient::new(self.clone())
    }

    /// COS client scoped to `instance` in `region`
    pub fn cos(&self, instance: &ResourceInstance, region: &str) -> CosClient {
        CosClient::new(
            self.clone(),
            self.endpoints.cos_for_region(region),
            instance.guid.clone(),
        )
    }

    /// Image client for the PowerVS instance selected by id or name
    pub async fn power_images(&self, selector: &InstanceSelector) -> Result<ImageClient> {
        let instance = self.resource_controller().find_power_instance(selector).await?;
        let base_url = self.endpoints.power_for_zone(&instance.region_id);
        debug!(
            "Using PowerVS instance {} [ID:{}] at {}",
            instance.name, instance.guid, base_url
        );
        Ok(ImageClient::new(self.clone(), instance, base_url))
    }

    // ===== Request helpers =====

    /// Start a request to an absolute URL
    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client.request(method, url)
    }

    /// Apply IAM bearer authentication to request
    async fn apply_auth(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token_manager.get_access_token().await?;
        Ok(request.header("Authorization", format!("Bearer {}", token)))
    }

    /// Send an authenticated request and return the raw response
    pub(crate) async fn send_raw(&self, request: RequestBuilder) -> Result<Response> {
        let request = self.apply_auth(request).await?;
        request.send().await.map_err(ApiError::HttpClient)
    }

    /// Send an authenticated request and decode a JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send_raw(request).await?;
        self.handle_response(response).await
    }

    /// Handle successful response
    pub(crate) async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        if response.status().is_success() {
            let body = response.text().await.map_err(ApiError::HttpClient)?;
            serde_json::from_str(&body).map_err(|e| ApiError::Decode {
                message: e.to_string(),
            })
        } else {
            self.handle_error_response(response).await
        }
    }

    /// Handle error response
    pub(crate) async fn handle_error_response<T>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&error_text)
            .ok()
            .and_then(|body| body.best_message());

        Err(status_error(status, message, error_text))
    }
}

fn status_error(status: StatusCode, message: Option<String>, raw: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Authentication {
            message: message.unwrap_or_else(|| "Authentication failed".into()),
        },
        StatusCode::FORBIDDEN => ApiError::Authorization {
            message: message.unwrap_or_else(|| "Access forbidden".into()),
        },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimitExceeded,
        StatusCode::NOT_FOUND => ApiError::NotFound {
            resource: message.unwrap_or_else(|| "Resource not found".into()),
        },
        StatusCode::BAD_REQUEST => ApiError::BadRequest {
            message: message.unwrap_or(raw),
        },
        _ => ApiError::Internal {
            message: format!(
                "Request failed with status {status}: {}",
                message.unwrap_or(raw)
            ),
        },
    }
}

/// Builder for constructing an IbmCloudClient with custom configuration
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    endpoints: Option<Endpoints>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// IBM Cloud API key exchanged for IAM tokens
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override service endpoints
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Point every service at one base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints = Some(Endpoints::single(url));
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<IbmCloudClient> {
        let endpoints = self.endpoints.unwrap_or_default();
        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let mut http_builder = reqwest::Client::builder().timeout(timeout);
        if let Some(connect_timeout) = self.connect_timeout {
            http_builder = http_builder.connect_timeout(connect_timeout);
        }
        let http_client = http_builder.build().map_err(ApiError::HttpClient)?;

        let token_manager = TokenManager::new(
            self.api_key.unwrap_or_default(),
            &endpoints.iam_url(),
            http_client.clone(),
        )?;

        Ok(IbmCloudClient {
            http_client,
            endpoints: Arc::new(endpoints),
            token_manager: Arc::new(token_manager),
        })
    }
}
