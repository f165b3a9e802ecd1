//! Cloud Object Storage client
//!
//! Talks to the S3-compatible COS endpoint with IAM bearer authentication.
//! Bucket listing is scoped to one COS instance through the
//! `ibm-service-instance-id` header.

use crate::{
    client::IbmCloudClient,
    error::{ApiError, Result},
    types::Bucket,
};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::debug;

const SERVICE_INSTANCE_HEADER: &str = "ibm-service-instance-id";

/// `ListAllMyBucketsResult` XML document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListAllMyBucketsResult {
    #[serde(default)]
    buckets: BucketList,
}

#[derive(Debug, Default, Deserialize)]
struct BucketList {
    #[serde(rename = "Bucket", default)]
    bucket: Vec<Bucket>,
}

/// COS client bound to one instance and one regional endpoint
#[derive(Debug, Clone)]
pub struct CosClient {
    client: IbmCloudClient,
    endpoint: String,
    instance_id: String,
}

impl CosClient {
    pub(crate) fn new(client: IbmCloudClient, endpoint: String, instance_id: String) -> Self {
        Self {
            client,
            endpoint,
            instance_id,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// List the buckets owned by this COS instance
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        let url = format!("{}/", self.endpoint);
        let request = self
            .client
            .request(Method::GET, &url)
            .header(SERVICE_INSTANCE_HEADER, &self.instance_id);

        let response = self.client.send_raw(request).await?;
        if !response.status().is_success() {
            return self.client.handle_error_response(response).await;
        }

        let body = response.text().await.map_err(ApiError::HttpClient)?;
        let buckets = parse_bucket_list(&body)?;
        debug!(
            "COS instance {} has {} buckets",
            self.instance_id,
            buckets.len()
        );
        Ok(buckets)
    }

    /// True if this instance owns a bucket named `bucket`
    pub async fn has_bucket(&self, bucket: &str) -> Result<bool> {
        Ok(self.list_buckets().await?.iter().any(|b| b.name == bucket))
    }

    /// Check whether `key` exists in `bucket`
    pub async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        let url = format!("{}/{}/{}", self.endpoint, bucket, encode_key(key));
        let request = self.client.request(Method::HEAD, &url);
        let response = self.client.send_raw(request).await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => self.client.handle_error_response(response).await,
        }
    }
}

fn parse_bucket_list(xml: &str) -> Result<Vec<Bucket>> {
    let result: ListAllMyBucketsResult =
        quick_xml::de::from_str(xml).map_err(|e| ApiError::Decode {
            message: format!("invalid bucket list: {e}"),
        })?;
    Ok(result.buckets.bucket)
}

/// Percent-encode each path segment of an object key
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
