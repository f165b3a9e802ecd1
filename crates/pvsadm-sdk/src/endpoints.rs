//! IBM Cloud service endpoints
//!
//! IAM and Resource Controller are global. COS and PowerVS endpoints depend
//! on the region (COS) or on the zone of the PowerVS instance (PowerVS);
//! both can be pinned to a fixed URL, which is how tests point the clients
//! at a mock server.

use serde::{Deserialize, Serialize};

pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";
pub const DEFAULT_RESOURCE_CONTROLLER_URL: &str = "https://resource-controller.cloud.ibm.com";

/// Base URLs of the services used by pvsadm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub iam: String,
    pub resource_controller: String,
    /// Fixed COS endpoint; derived from the region when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cos: Option<String>,
    /// Fixed PowerVS endpoint; derived from the instance zone when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            iam: DEFAULT_IAM_URL.to_string(),
            resource_controller: DEFAULT_RESOURCE_CONTROLLER_URL.to_string(),
            cos: None,
            power: None,
        }
    }
}

impl Endpoints {
    /// Point every service at the same base URL
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            iam: base_url.clone(),
            resource_controller: base_url.clone(),
            cos: Some(base_url.clone()),
            power: Some(base_url),
        }
    }

    /// Public S3 endpoint of COS in `region`
    pub fn cos_for_region(&self, region: &str) -> String {
        match &self.cos {
            Some(url) => trim(url),
            None => format!("https://s3.{region}.cloud-object-storage.appdomain.cloud"),
        }
    }

    /// PowerVS API endpoint serving `zone`
    pub fn power_for_zone(&self, zone: &str) -> String {
        match &self.power {
            Some(url) => trim(url),
            None => format!("https://{}.power-iaas.cloud.ibm.com", power_region(zone)),
        }
    }

    pub(crate) fn iam_url(&self) -> String {
        trim(&self.iam)
    }

    pub(crate) fn resource_controller_url(&self) -> String {
        trim(&self.resource_controller)
    }
}

fn trim(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Map a PowerVS zone (`lon04`, `dal12`, `eu-de-1`) to its API region
pub fn power_region(zone: &str) -> String {
    let zone = zone.to_lowercase();
    let prefixes: &[(&str, &str)] = &[
        ("dal", "us-south"),
        ("us-south", "us-south"),
        ("wdc", "us-east"),
        ("us-east", "us-east"),
        ("eu-de", "eu-de"),
        ("fra", "eu-de"),
        ("lon", "lon"),
        ("mad", "mad"),
        ("mon", "mon"),
        ("osa", "osa"),
        ("sao", "sao"),
        ("syd", "syd"),
        ("tok", "tok"),
        ("tor", "tor"),
        ("che", "che"),
    ];

    prefixes
        .iter()
        .find(|(prefix, _)| zone.starts_with(prefix))
        .map(|(_, region)| region.to_string())
        .unwrap_or_else(|| {
            zone.trim_end_matches(|c: char| c.is_ascii_digit())
                .trim_end_matches('-')
                .to_string()
        })
}
