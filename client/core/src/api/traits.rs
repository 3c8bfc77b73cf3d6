//! Admin API Trait
//!
//! The operations the provisioning workflow needs from the admin server.
//! The workflow only ever talks to this trait, so it can run against the
//! REST client or against an in-memory double in tests.

use async_trait::async_trait;

use super::error::ApiError;
use super::types::{
    ContainerInfo, CounterDeletion, DeploymentProperties, FieldValueCounter, MetricInfo,
    StreamDefinition,
};

/// Stream, runtime and counter operations of the admin server
#[async_trait]
pub trait XdOperations: Send + Sync {
    /// List running worker containers
    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, ApiError>;

    /// List all stream definitions
    async fn list_streams(&self) -> Result<Vec<StreamDefinition>, ApiError>;

    /// Create a stream definition, optionally deploying it right away
    async fn create_stream(
        &self,
        name: &str,
        definition: &str,
        deploy: bool,
    ) -> Result<StreamDefinition, ApiError>;

    /// Deploy an existing stream definition
    async fn deploy_stream(
        &self,
        name: &str,
        properties: &DeploymentProperties,
    ) -> Result<(), ApiError>;

    /// Stop a deployed stream, keeping its definition
    async fn undeploy_stream(&self, name: &str) -> Result<(), ApiError>;

    /// Remove a stream definition
    async fn destroy_stream(&self, name: &str) -> Result<(), ApiError>;

    /// List field-value counters
    async fn list_counters(&self) -> Result<Vec<MetricInfo>, ApiError>;

    /// Fetch a field-value counter with its counts
    async fn retrieve_counter(&self, name: &str) -> Result<FieldValueCounter, ApiError>;

    /// Delete a field-value counter
    ///
    /// A missing counter is reported as [`CounterDeletion::NotFound`], not as
    /// an error.
    async fn delete_counter(&self, name: &str) -> Result<CounterDeletion, ApiError>;
}
