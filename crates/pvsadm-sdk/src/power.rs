//! PowerVS image client and purge candidate selection

use crate::{
    client::IbmCloudClient,
    error::{ApiError, Result},
    types::{CreateImage, Image, ImageReference, Images, ResourceInstance},
};
use chrono::{DateTime, Utc};
use pvsadm_common::utils::is_purgeable;
use regex::Regex;
use reqwest::{Method, RequestBuilder, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// How the user identified the PowerVS instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceSelector {
    /// Instance GUID (`--instance-id`)
    Id(String),
    /// Instance display name (`--instance-name`)
    Name(String),
}

impl InstanceSelector {
    /// Prefer the id when both are given
    pub fn from_flags(id: Option<String>, name: Option<String>) -> Option<Self> {
        match (id, name) {
            (Some(id), _) if !id.is_empty() => Some(Self::Id(id)),
            (_, Some(name)) if !name.is_empty() => Some(Self::Name(name)),
            _ => None,
        }
    }

    pub fn matches(&self, instance: &ResourceInstance) -> bool {
        match self {
            Self::Id(id) => instance.guid == *id || instance.id == *id,
            Self::Name(name) => instance.name == *name,
        }
    }
}

impl fmt::Display for InstanceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Name(name) => write!(f, "name {name}"),
        }
    }
}

/// Name pattern and age window used to pick images for deletion
#[derive(Debug, Clone)]
pub struct PurgeFilter {
    before: Duration,
    since: Duration,
    pattern: Option<Regex>,
}

impl PurgeFilter {
    /// `expr` is an unanchored regular expression; empty matches every name
    pub fn new(before: Duration, since: Duration, expr: &str) -> Result<Self> {
        let pattern = if expr.is_empty() {
            None
        } else {
            Some(Regex::new(expr).map_err(|source| ApiError::InvalidPattern {
                pattern: expr.to_string(),
                source,
            })?)
        };

        Ok(Self {
            before,
            since,
            pattern,
        })
    }

    /// True if the image name matches and its creation date is in the window
    pub fn matches(&self, image: &ImageReference, now: DateTime<Utc>) -> bool {
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(&image.name) {
                return false;
            }
        }
        is_purgeable(image.creation_date, self.before, self.since, now)
    }

    /// Keep the images that match, preserving order
    pub fn select(&self, images: Vec<ImageReference>, now: DateTime<Utc>) -> Vec<ImageReference> {
        images
            .into_iter()
            .filter(|image| self.matches(image, now))
            .collect()
    }
}

/// Image operations on one PowerVS cloud instance
#[derive(Debug, Clone)]
pub struct ImageClient {
    client: IbmCloudClient,
    instance: ResourceInstance,
    base_url: String,
}

impl ImageClient {
    pub(crate) fn new(client: IbmCloudClient, instance: ResourceInstance, base_url: String) -> Self {
        Self {
            client,
            instance,
            base_url,
        }
    }

    pub fn instance(&self) -> &ResourceInstance {
        &self.instance
    }

    /// Get one image
    pub async fn get(&self, id: &str) -> Result<Image> {
        let request = self.request(Method::GET, &format!("/images/{id}"));
        self.client.send_json(request).await
    }

    /// List all images of the instance
    pub async fn get_all(&self) -> Result<Vec<ImageReference>> {
        let request = self.request(Method::GET, "/images");
        let images: Images = self.client.send_json(request).await?;
        Ok(images.images)
    }

    /// Delete an image
    pub async fn delete(&self, id: &str) -> Result<()> {
        let request = self.request(Method::DELETE, &format!("/images/{id}"));
        let response = self.client.send_raw(request).await?;
        if response.status().is_success() {
            debug!("Deleted image {}", id);
            Ok(())
        } else {
            self.client.handle_error_response(response).await
        }
    }

    /// Start importing an image from object storage
    ///
    /// Only `201 Created` means the import job was queued; a `200 OK`
    /// answer is reported as [`ApiError::ImportNotInitiated`].
    pub async fn import_image(&self, body: &CreateImage) -> Result<Image> {
        let request = self.request(Method::POST, "/images").json(body);
        let response = self.client.send_raw(request).await?;

        match response.status() {
            StatusCode::CREATED => {
                let image: Image = self.client.handle_response(response).await?;
                if image.state == "queued" {
                    info!("Post is successful {}", image.image_id);
                }
                Ok(image)
            }
            StatusCode::OK => Err(ApiError::ImportNotInitiated),
            _ => self.client.handle_error_response(response).await,
        }
    }

    /// Images matching `expr` whose creation date falls in the window
    pub async fn get_all_purgeable(
        &self,
        before: Duration,
        since: Duration,
        expr: &str,
    ) -> Result<Vec<ImageReference>> {
        let filter = PurgeFilter::new(before, since, expr)?;
        self.select_purgeable(&filter).await
    }

    /// List the instance's images and keep those `filter` selects
    ///
    /// Takes a prepared filter so callers can reject a bad pattern before
    /// resolving the instance.
    pub async fn select_purgeable(&self, filter: &PurgeFilter) -> Result<Vec<ImageReference>> {
        let images = self.get_all().await.map_err(|e| ApiError::Internal {
            message: format!("failed to get the list of images: {e}"),
        })?;
        let total = images.len();
        let selected = filter.select(images, Utc::now());
        debug!("{} of {} images selected for purge", selected.len(), total);
        Ok(selected)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!(
            "{}/pcloud/v1/cloud-instances/{}{}",
            self.base_url, self.instance.guid, path
        );
        self.client
            .request(method, &url)
            .header("CRN", &self.instance.crn)
    }
}
