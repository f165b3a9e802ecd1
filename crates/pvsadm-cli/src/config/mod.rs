//! Configuration management for pvsadm
//!
//! Values are layered: built-in defaults, then the TOML file
//! (`$XDG_CONFIG_HOME/pvsadm/config.toml` unless `--config` is given),
//! then `PVSADM_` environment variables with `__` separating sections,
//! e.g. `PVSADM_API__TIMEOUT_SECS=60`.

use etcetera::{choose_base_strategy, BaseStrategy};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use pvsadm_common::ConfigurationError;
use pvsadm_sdk::endpoints::{DEFAULT_IAM_URL, DEFAULT_RESOURCE_CONTROLLER_URL};
use pvsadm_sdk::import::DEFAULT_SERVICE_CREDENTIAL_NAME;
use pvsadm_sdk::Endpoints;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const ENV_PREFIX: &str = "PVSADM_";

/// CLI configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CliConfig {
    /// IBM Cloud API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Image command defaults
    #[serde(default)]
    pub image: ImageConfig,
}

/// IBM Cloud API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// IAM token service
    pub iam_url: String,

    /// Resource Controller
    pub resource_controller_url: String,

    /// Fixed COS endpoint, derived from the bucket region when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cos_url: Option<String>,

    /// Fixed PowerVS endpoint, derived from the instance zone when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// API key used when neither `--api-key` nor `IBMCLOUD_API_KEY` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            iam_url: DEFAULT_IAM_URL.to_string(),
            resource_controller_url: DEFAULT_RESOURCE_CONTROLLER_URL.to_string(),
            cos_url: None,
            power_url: None,
            timeout_secs: pvsadm_sdk::client::DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

impl ApiConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            iam: self.iam_url.clone(),
            resource_controller: self.resource_controller_url.clone(),
            cos: self.cos_url.clone(),
            power: self.power_url.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Image command defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    /// Service credential created or reused for HMAC keys
    pub service_credential_name: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            service_credential_name: DEFAULT_SERVICE_CREDENTIAL_NAME.to_string(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let path = match path {
            Some(path) => expand_path(path),
            None => Self::default_path()?,
        };
        Self::load_from_file(&path)
    }

    /// Merge defaults, the TOML file (if present) and the environment
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigurationError> {
        debug!("Loading configuration from: {}", path.display());

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        } else {
            debug!(
                "Configuration file not found, using defaults: {}",
                path.display()
            );
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigurationError::ParseError {
                details: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.api.timeout_secs == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "api.timeout_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.image.service_credential_name.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue {
                key: "image.service_credential_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Get configuration directory
    pub fn config_dir() -> Result<PathBuf, ConfigurationError> {
        let strategy = choose_base_strategy()
            .map_err(|e| ConfigurationError::BaseDirectories(e.to_string()))?;
        Ok(strategy.config_dir().join("pvsadm"))
    }

    pub fn default_path() -> Result<PathBuf, ConfigurationError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

/// Expand `~` and environment variables in a user-supplied path
fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => match shellexpand::full(raw) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
        },
        None => path.to_path_buf(),
    }
}
