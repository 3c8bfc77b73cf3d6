//! Admin Server API
//!
//! Access to the stream-processing platform's REST administration interface
//! through a common trait.
//!
//! # Usage
//!
//! ```ignore
//! use xd_client_core::api::{XdOperations, XdRestClient};
//!
//! let client = XdRestClient::new("http://localhost:9393".parse()?)?;
//! for stream in client.list_streams().await? {
//!     println!("{} = {}", stream.name, stream.definition);
//! }
//! ```

mod error;
mod rest;
mod traits;
mod types;

pub use error::ApiError;
pub use rest::{RestClientConfig, XdRestClient};
pub use traits::XdOperations;
pub use types::{
    format_deployment_properties, ContainerInfo, CounterDeletion, DeploymentProperties,
    FieldValueCounter, MetricInfo, Page, PageMetadata, StreamDefinition,
};
