//! CLI-specific client creation
//!
//! The API key comes from `--api-key` / `IBMCLOUD_API_KEY` first, then from
//! the `api.api_key` configuration value.

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use pvsadm_sdk::{ClientBuilder, IbmCloudClient};
use tracing::debug;

/// Resolve the API key from the command line or configuration
pub fn resolve_api_key(config: &CliConfig, flag: Option<&str>) -> Result<String> {
    flag.filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| config.api.api_key.clone().filter(|key| !key.is_empty()))
        .ok_or_else(|| {
            CliError::invalid_argument(
                "API key is required: set IBMCLOUD_API_KEY or pass --api-key",
            )
        })
}

/// Creates an IBM Cloud client authenticated with the resolved API key
pub fn create_client(config: &CliConfig, api_key: Option<&str>) -> Result<IbmCloudClient> {
    let api_key = resolve_api_key(config, api_key)?;
    debug!(
        "Using IAM endpoint {} with timeout {}s",
        config.api.iam_url, config.api.timeout_secs
    );

    ClientBuilder::default()
        .api_key(api_key)
        .endpoints(config.api.endpoints())
        .timeout(config.api.timeout())
        .build()
        .map_err(CliError::from)
}
