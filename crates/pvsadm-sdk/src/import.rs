//! Image import workflow
//!
//! Importing an image from object storage takes four steps:
//! 1. find the COS instance that owns the bucket,
//! 2. verify the object exists in that bucket,
//! 3. obtain HMAC keys, either given by the caller or read from a
//!    service credential (created on demand),
//! 4. ask PowerVS to import the object.

use crate::{
    client::IbmCloudClient,
    cos::CosClient,
    error::{ApiError, Result},
    power::InstanceSelector,
    resource_controller::SERVICE_INSTANCE_TYPE,
    types::{CreateImage, HmacKeys, Image, ResourceInstance},
};
use pvsadm_common::{OsType, StorageType};
use serde_json::json;
use tracing::{debug, info, warn};

/// Service credential created when no HMAC keys are supplied
pub const DEFAULT_SERVICE_CREDENTIAL_NAME: &str = "pvsadm-service-cred";

/// CRN fragment identifying Cloud Object Storage instances
const COS_CRN_MARKER: &str = "cloud-object-storage";

/// Parameters of `pvsadm image import`
#[derive(Debug, Clone)]
pub struct ImportImageOptions {
    pub instance: InstanceSelector,
    pub bucket: String,
    pub region: String,
    pub object_name: String,
    pub image_name: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub os_type: OsType,
    pub storage_type: StorageType,
    pub service_credential_name: String,
}

impl ImportImageOptions {
    /// Caller-provided keys, only when both are non-empty
    fn explicit_keys(&self) -> Option<HmacKeys> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) if !access.is_empty() && !secret.is_empty() => {
                Some(HmacKeys {
                    access_key_id: access.clone(),
                    secret_access_key: secret.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Bucket location found during the import
#[derive(Debug, Clone)]
pub struct BucketLocation {
    pub instance: ResourceInstance,
    pub cos: CosClient,
}

/// Runs the import workflow against IBM Cloud
pub struct ImageImporter<'a> {
    client: &'a IbmCloudClient,
}

impl<'a> ImageImporter<'a> {
    pub fn new(client: &'a IbmCloudClient) -> Self {
        Self { client }
    }

    /// Import `options.object_name` as a PowerVS image
    pub async fn import(&self, options: &ImportImageOptions) -> Result<Image> {
        let location = self
            .find_bucket_instance(&options.bucket, &options.region)
            .await?;
        info!(
            "{} bucket found in the {}[ID:{}] COS instance",
            options.bucket, location.instance.name, location.instance.id
        );

        if !location
            .cos
            .object_exists(&options.bucket, &options.object_name)
            .await?
        {
            return Err(ApiError::ObjectNotFound {
                object: options.object_name.clone(),
                bucket: options.bucket.clone(),
            });
        }
        info!(
            "{} object found in the {} bucket",
            options.object_name, options.bucket
        );

        let keys = match options.explicit_keys() {
            Some(keys) => keys,
            None => {
                self.resolve_hmac_keys(&location.instance, &options.service_credential_name)
                    .await?
            }
        };

        let images = self.client.power_images(&options.instance).await?;
        let body = CreateImage {
            source: "url".to_string(),
            image_name: options.image_name.clone(),
            image_filename: options.object_name.clone(),
            region: options.region.clone(),
            access_key: keys.access_key_id,
            secret_key: keys.secret_access_key,
            bucket_name: options.bucket.clone(),
            os_type: options.os_type.to_string(),
            disk_type: options.storage_type.to_string(),
        };

        let image = images.import_image(&body).await?;
        info!(
            "Importing Image {} is currently in {} state",
            image.name, image.state
        );
        Ok(image)
    }

    /// Scan COS instances in order and return the first that owns `bucket`
    ///
    /// Instances whose buckets cannot be listed are skipped.
    pub async fn find_bucket_instance(&self, bucket: &str, region: &str) -> Result<BucketLocation> {
        let instances = self
            .client
            .resource_controller()
            .list_resource_instances(SERVICE_INSTANCE_TYPE)
            .await?;

        for instance in instances
            .into_iter()
            .filter(|instance| instance.crn.contains(COS_CRN_MARKER))
        {
            let cos = self.client.cos(&instance, region);
            debug!(
                "Looking for bucket {} in COS instance {} at {}",
                bucket,
                instance.name,
                cos.endpoint()
            );
            match cos.has_bucket(bucket).await {
                Ok(true) => return Ok(BucketLocation { instance, cos }),
                Ok(false) => debug!("{} not found in COS instance {}", bucket, instance.name),
                Err(e) => {
                    warn!("Skipping COS instance {}: {}", instance.name, e);
                }
            }
        }

        Err(ApiError::BucketNotFound {
            bucket: bucket.to_string(),
        })
    }

    /// Read HMAC keys from the named service credential, creating it if absent
    pub async fn resolve_hmac_keys(
        &self,
        cos_instance: &ResourceInstance,
        credential_name: &str,
    ) -> Result<HmacKeys> {
        let rc = self.client.resource_controller();
        let keys = rc
            .list_resource_keys(credential_name)
            .await
            .map_err(|e| ApiError::ServiceCredentials {
                message: e.to_string(),
            })?;

        let credentials = match keys.into_iter().next() {
            Some(existing) => {
                info!("Reading the existing service credential: {}", credential_name);
                existing.credentials
            }
            None => {
                info!(
                    "Auto Generating the COS Service credential for importing the image with name: {}",
                    credential_name
                );
                rc.create_resource_key(
                    credential_name,
                    &cos_instance.id,
                    Some(json!({ "HMAC": true })),
                )
                .await?
                .credentials
            }
        };

        credentials
            .hmac_keys()
            .ok_or_else(|| ApiError::CredentialsMissing {
                name: credential_name.to_string(),
            })
    }
}
