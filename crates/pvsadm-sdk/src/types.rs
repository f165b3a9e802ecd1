//! Type definitions for the IBM Cloud resources handled by pvsadm
//!
//! These mirror the JSON returned by the remote APIs; unknown fields are
//! ignored so new server-side attributes do not break decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ===== Resource Controller =====

/// A provisioned service instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInstance {
    pub id: String,
    #[serde(default)]
    pub guid: String,
    pub crn: String,
    pub name: String,
    /// Region or zone the instance lives in
    #[serde(default)]
    pub region_id: String,
    /// Catalog service ID
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub state: String,
}

/// One page of `GET /v2/resource_instances`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInstancesList {
    #[serde(default)]
    pub rows_count: u64,
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default)]
    pub resources: Vec<ResourceInstance>,
}

/// Service credential attached to an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceKey {
    pub id: String,
    #[serde(default)]
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub crn: String,
    #[serde(default)]
    pub source_crn: String,
    #[serde(default)]
    pub credentials: Credentials,
}

/// One page of `GET /v2/resource_keys`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceKeysList {
    #[serde(default)]
    pub rows_count: u64,
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default)]
    pub resources: Vec<ResourceKey>,
}

/// Body of `POST /v2/resource_keys`
#[derive(Debug, Clone, Serialize)]
pub struct CreateResourceKeyRequest {
    pub name: String,
    /// ID or GUID of the instance the key is created for
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Free-form credential properties of a resource key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(pub Map<String, Value>);

impl Credentials {
    /// Raw property value
    pub fn get_property(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// HMAC keys generated for COS credentials created with `{"HMAC": true}`
    pub fn hmac_keys(&self) -> Option<HmacKeys> {
        self.get_property("cos_hmac_keys")
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }
}

/// Access/secret key pair for S3-compatible COS access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmacKeys {
    pub access_key_id: String,
    pub secret_access_key: String,
}

// ===== Cloud Object Storage =====

/// A COS bucket as listed by the S3 endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bucket {
    pub name: String,
    #[serde(default)]
    pub creation_date: Option<String>,
}

// ===== PowerVS =====

/// Image specification details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpecifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endianness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_type: Option<String>,
}

/// Image entry as returned by the image list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    #[serde(rename = "imageID")]
    pub image_id: String,
    pub name: String,
    #[serde(default)]
    pub state: String,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub last_update_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub storage_type: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub specifications: Option<ImageSpecifications>,
}

/// `GET /pcloud/v1/cloud-instances/{id}/images`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub images: Vec<ImageReference>,
}

/// Full image detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "imageID")]
    pub image_id: String,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_update_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub storage_type: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub specifications: Option<ImageSpecifications>,
}

/// Body of the image import request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImage {
    /// Always `url` for imports from object storage
    pub source: String,
    pub image_name: String,
    pub image_filename: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket_name: String,
    pub os_type: String,
    pub disk_type: String,
}
