//! Resource Controller v2 client
//!
//! Lists service instances and manages resource keys (service credentials).

use crate::{
    client::IbmCloudClient,
    error::{ApiError, Result},
    power::InstanceSelector,
    types::{
        CreateResourceKeyRequest, ResourceInstance, ResourceInstancesList, ResourceKey,
        ResourceKeysList,
    },
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Catalog ID of the PowerVS (`power-iaas`) service
pub const POWER_IAAS_SERVICE_ID: &str = "abd259f0-9990-11e8-acc8-b9f54a8f1661";

/// Resource type of provisioned service instances
pub const SERVICE_INSTANCE_TYPE: &str = "service_instance";

/// Upper bound on followed `next_url` links
const MAX_PAGES: usize = 100;

/// Client for `https://resource-controller.cloud.ibm.com/v2`
#[derive(Debug, Clone)]
pub struct ResourceControllerClient {
    client: IbmCloudClient,
    base_url: String,
}

/// Paged list responses
trait Page<T> {
    fn next_url(&self) -> Option<&str>;
    fn into_resources(self) -> Vec<T>;
}

impl Page<ResourceInstance> for ResourceInstancesList {
    fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref()
    }

    fn into_resources(self) -> Vec<ResourceInstance> {
        self.resources
    }
}

impl Page<ResourceKey> for ResourceKeysList {
    fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref()
    }

    fn into_resources(self) -> Vec<ResourceKey> {
        self.resources
    }
}

impl ResourceControllerClient {
    pub(crate) fn new(client: IbmCloudClient) -> Self {
        let base_url = client.endpoints().resource_controller_url();
        Self { client, base_url }
    }

    // ===== Resource instances =====

    /// List all resource instances of the given type (e.g. `service_instance`)
    pub async fn list_resource_instances(&self, resource_type: &str) -> Result<Vec<ResourceInstance>> {
        self.list_all::<ResourceInstancesList, _>("/v2/resource_instances", &[("type", resource_type)])
            .await
    }

    /// List all instances of a catalog service
    pub async fn list_resource_instances_by_resource_id(
        &self,
        resource_id: &str,
    ) -> Result<Vec<ResourceInstance>> {
        self.list_all::<ResourceInstancesList, _>(
            "/v2/resource_instances",
            &[("type", SERVICE_INSTANCE_TYPE), ("resource_id", resource_id)],
        )
        .await
    }

    /// Resolve a PowerVS instance by GUID or by name
    pub async fn find_power_instance(&self, selector: &InstanceSelector) -> Result<ResourceInstance> {
        let instances = self
            .list_resource_instances_by_resource_id(POWER_IAAS_SERVICE_ID)
            .await?;

        instances
            .into_iter()
            .find(|instance| selector.matches(instance))
            .ok_or_else(|| ApiError::InstanceNotFound {
                instance: selector.to_string(),
            })
    }

    // ===== Resource keys =====

    /// List resource keys with the given name
    pub async fn list_resource_keys(&self, name: &str) -> Result<Vec<ResourceKey>> {
        self.list_all::<ResourceKeysList, _>("/v2/resource_keys", &[("name", name)])
            .await
    }

    /// Create a resource key for the instance identified by `source`
    pub async fn create_resource_key(
        &self,
        name: &str,
        source: &str,
        parameters: Option<Value>,
    ) -> Result<ResourceKey> {
        let body = CreateResourceKeyRequest {
            name: name.to_string(),
            source: source.to_string(),
            parameters,
        };
        let url = format!("{}/v2/resource_keys", self.base_url);
        let request = self.client.request(Method::POST, &url).json(&body);
        self.client.send_json(request).await
    }

    // ===== Private Helper Methods =====

    /// Fetch the first page and follow `next_url` until exhausted
    async fn list_all<P, T>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>>
    where
        P: Page<T> + DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let request = self.client.request(Method::GET, &url).query(query);
        let mut page: P = self.client.send_json(request).await?;

        let mut resources = Vec::new();
        for _ in 0..MAX_PAGES {
            let next = page.next_url().map(|next| self.absolute(next)).transpose()?;
            resources.extend(page.into_resources());

            let Some(next) = next else {
                return Ok(resources);
            };
            debug!("Fetching next page: {}", next);
            page = self
                .client
                .send_json(self.client.request(Method::GET, &next))
                .await?;
        }

        Err(ApiError::Internal {
            message: format!("Too many pages while listing {path}"),
        })
    }

    /// `next_url` is relative to the service root
    fn absolute(&self, next_url: &str) -> Result<String> {
        let base = Url::parse(&self.base_url).map_err(|e| ApiError::InvalidRequest {
            message: format!("invalid Resource Controller URL {}: {e}", self.base_url),
        })?;
        base.join(next_url)
            .map(String::from)
            .map_err(|e| ApiError::Decode {
                message: format!("invalid next_url {next_url}: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::client::ClientBuilder;
    use crate::power::InstanceSelector;
    use crate::ApiError;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, crate::IbmCloudClient) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test-token",
                "expires_in": 3600,
            })))
            .mount(&mock_server)
            .await;
        let client = ClientBuilder::default()
            .api_key("key")
            .base_url(mock_server.uri())
            .build()
            .unwrap();
        (mock_server, client)
    }

    fn instance(name: &str, guid: &str) -> serde_json::Value {
        json!({
            "id": format!("crn:v1:bluemix:public:power-iaas:lon04:a/acc:{guid}::"),
            "guid": guid,
            "crn": format!("crn:v1:bluemix:public:power-iaas:lon04:a/acc:{guid}::"),
            "name": name,
            "region_id": "lon04",
            "resource_id": super::POWER_IAAS_SERVICE_ID,
        })
    }

    #[test]
    fn test_next_url_resolution() {
        let client = ClientBuilder::default()
            .api_key("key")
            .base_url("https://rc.example.com")
            .build()
            .unwrap();
        let rc = client.resource_controller();

        assert_eq!(
            rc.absolute("/v2/resource_keys?start=abc").unwrap(),
            "https://rc.example.com/v2/resource_keys?start=abc"
        );
        assert_eq!(
            rc.absolute("https://other.example.com/v2/resource_keys").unwrap(),
            "https://other.example.com/v2/resource_keys"
        );
    }

    #[tokio::test]
    async fn test_pagination_follows_next_url() {
        let (mock_server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v2/resource_instances"))
            .and(query_param("type", "service_instance"))
            .and(query_param("start", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rows_count": 1,
                "next_url": null,
                "resources": [instance("second", "g2")],
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/resource_instances"))
            .and(query_param("type", "service_instance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rows_count": 1,
                "next_url": "/v2/resource_instances?type=service_instance&start=page2",
                "resources": [instance("first", "g1")],
            })))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        let instances = client
            .resource_controller()
            .list_resource_instances("service_instance")
            .await
            .unwrap();

        let names: Vec<_> = instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_find_power_instance_by_name_and_id() {
        let (mock_server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v2/resource_instances"))
            .and(query_param("resource_id", super::POWER_IAAS_SERVICE_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": [instance("upstream-core-lon04", "g1"), instance("other", "g2")],
            })))
            .mount(&mock_server)
            .await;

        let rc = client.resource_controller();
        let by_name = rc
            .find_power_instance(&InstanceSelector::Name("upstream-core-lon04".into()))
            .await
            .unwrap();
        assert_eq!(by_name.guid, "g1");

        let by_id = rc
            .find_power_instance(&InstanceSelector::Id("g2".into()))
            .await
            .unwrap();
        assert_eq!(by_id.name, "other");

        let missing = rc
            .find_power_instance(&InstanceSelector::Name("nope".into()))
            .await
            .unwrap_err();
        assert!(matches!(missing, ApiError::InstanceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_resource_key_with_hmac() {
        let (mock_server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/v2/resource_keys"))
            .and(body_json(json!({
                "name": "pvsadm-service-cred",
                "source": "cos-guid",
                "parameters": {"HMAC": true},
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "key-1",
                "name": "pvsadm-service-cred",
                "credentials": {
                    "cos_hmac_keys": {"access_key_id": "ak", "secret_access_key": "sk"}
                }
            })))
            .mount(&mock_server)
            .await;

        let key = client
            .resource_controller()
            .create_resource_key("pvsadm-service-cred", "cos-guid", Some(json!({"HMAC": true})))
            .await
            .unwrap();

        assert_eq!(key.credentials.hmac_keys().unwrap().access_key_id, "ak");
    }
}
