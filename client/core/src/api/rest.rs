//! REST Client Implementation
//!
//! [`XdOperations`] over the admin server's HTTP interface.
//!
//! # Endpoints
//!
//! - `/runtime/containers` - running containers (paged)
//! - `/streams/definitions` - list, create (`POST`), destroy (`DELETE /{name}`)
//! - `/streams/deployments/{name}` - deploy (`POST`), undeploy (`DELETE`)
//! - `/metrics/field-value-counters` - list, retrieve (`/{name}`), delete (`DELETE /{name}`)
//!
//! Collections are paged; list operations follow every page.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{error_message, ApiError};
use super::traits::XdOperations;
use super::types::{
    format_deployment_properties, ContainerInfo, CounterDeletion, DeploymentProperties,
    FieldValueCounter, MetricInfo, Page, StreamDefinition,
};

const CONTAINERS: &[&str] = &["runtime", "containers"];
const STREAM_DEFINITIONS: &[&str] = &["streams", "definitions"];
const STREAM_DEPLOYMENTS: &[&str] = &["streams", "deployments"];
const FIELD_VALUE_COUNTERS: &[&str] = &["metrics", "field-value-counters"];

/// HTTP settings for [`XdRestClient`]
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Items requested per page on list endpoints
    pub page_size: u32,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            page_size: 100,
        }
    }
}

/// Admin server REST client
#[derive(Clone)]
pub struct XdRestClient {
    /// Admin server base URL
    base_url: Url,
    /// Items requested per page
    page_size: u32,
    /// HTTP client
    http_client: reqwest::Client,
}

impl XdRestClient {
    /// Create a client with default HTTP settings
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        Self::with_config(base_url, &RestClientConfig::default())
    }

    /// Create a client with explicit HTTP settings
    pub fn with_config(base_url: Url, config: &RestClientConfig) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            base_url,
            page_size: config.page_size.max(1),
            http_client,
        })
    }

    /// Build an endpoint URL from path segments below the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build an endpoint URL for a named resource below a collection
    fn resource(&self, collection: &[&str], name: &str) -> Result<Url, ApiError> {
        let mut segments = collection.to_vec();
        segments.push(name);
        self.endpoint(&segments)
    }

    /// Map non-success responses to errors
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let resource = response.url().path().to_string();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { resource });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(resource = %resource, error = %e, "Failed to read error body");
                String::new()
            }
        };
        Err(ApiError::Status {
            status,
            message: error_message(&body),
        })
    }

    /// Decode a JSON response body
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let url = response.url().to_string();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(url = %url, "GET");
        let response = self.http_client.get(url).send().await?;
        Self::decode(Self::check(response).await?).await
    }

    async fn delete(&self, url: Url) -> Result<(), ApiError> {
        debug!(url = %url, "DELETE");
        let response = self.http_client.delete(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn post_form(&self, url: Url, form: &[(&str, &str)]) -> Result<Response, ApiError> {
        debug!(url = %url, "POST");
        let response = self.http_client.post(url).form(form).send().await?;
        Self::check(response).await
    }

    /// Fetch every page of a collection
    async fn list_all<T: DeserializeOwned>(&self, collection: &[&str]) -> Result<Vec<T>, ApiError> {
        let base = self.endpoint(collection)?;
        let size = self.page_size.to_string();
        let mut items = Vec::new();
        let mut number: u64 = 0;

        loop {
            let mut url = base.clone();
            url.query_pairs_mut()
                .append_pair("page", &number.to_string())
                .append_pair("size", &size);

            let page: Page<T> = self.get_json(url).await?;
            if let Some(meta) = page.page {
                debug!(
                    page = meta.number,
                    total_pages = meta.total_pages,
                    total_elements = meta.total_elements,
                    "Fetched page"
                );
            }
            let has_next = page.has_next();
            let fetched = page.content.len();
            items.extend(page.content);

            if !has_next || fetched == 0 {
                break;
            }
            number += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl XdOperations for XdRestClient {
    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, ApiError> {
        self.list_all(CONTAINERS).await
    }

    async fn list_streams(&self) -> Result<Vec<StreamDefinition>, ApiError> {
        self.list_all(STREAM_DEFINITIONS).await
    }

    async fn create_stream(
        &self,
        name: &str,
        definition: &str,
        deploy: bool,
    ) -> Result<StreamDefinition, ApiError> {
        let url = self.endpoint(STREAM_DEFINITIONS)?;
        let deploy = if deploy { "true" } else { "false" };
        let response = self
            .post_form(
                url,
                &[("name", name), ("definition", definition), ("deploy", deploy)],
            )
            .await?;

        // Older servers answer with an empty body
        let url = response.url().to_string();
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(StreamDefinition::new(name, definition));
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }

    async fn deploy_stream(
        &self,
        name: &str,
        properties: &DeploymentProperties,
    ) -> Result<(), ApiError> {
        let url = self.resource(STREAM_DEPLOYMENTS, name)?;
        let properties = format_deployment_properties(properties);
        self.post_form(url, &[("properties", properties.as_str())])
            .await?;
        Ok(())
    }

    async fn undeploy_stream(&self, name: &str) -> Result<(), ApiError> {
        self.delete(self.resource(STREAM_DEPLOYMENTS, name)?).await
    }

    async fn destroy_stream(&self, name: &str) -> Result<(), ApiError> {
        self.delete(self.resource(STREAM_DEFINITIONS, name)?).await
    }

    async fn list_counters(&self) -> Result<Vec<MetricInfo>, ApiError> {
        self.list_all(FIELD_VALUE_COUNTERS).await
    }

    async fn retrieve_counter(&self, name: &str) -> Result<FieldValueCounter, ApiError> {
        self.get_json(self.resource(FIELD_VALUE_COUNTERS, name)?)
            .await
    }

    async fn delete_counter(&self, name: &str) -> Result<CounterDeletion, ApiError> {
        match self.delete(self.resource(FIELD_VALUE_COUNTERS, name)?).await {
            Ok(()) => Ok(CounterDeletion::Deleted),
            Err(e) if e.is_not_found() => Ok(CounterDeletion::NotFound),
            Err(e) => Err(e),
        }
    }
}
