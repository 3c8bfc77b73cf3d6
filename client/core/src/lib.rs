//! XD Client Core - Wordcount Stream Provisioning
//!
//! This crate drives a Spring XD admin server through its REST API: it
//! provisions a two-stream wordcount pipeline, waits for data to flow and
//! reports the most frequent words from the resulting field-value counter.
//! All stream execution and aggregation happen on the server.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      Provisioner                           │
//! │  diagnose → cleanup → create/deploy → wait → report        │
//! │       │                                  │        │        │
//! │       │                            readiness   report      │
//! └───────┼───────────────────────────────────────────────────┘
//!         │ XdOperations (trait)
//!   ┌─────┴──────────┐
//!   │  XdRestClient  │ ── HTTP ──▶  admin server
//!   └────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`XdOperations`]: stream, runtime and counter operations of the server
//! - [`XdRestClient`]: the HTTP implementation
//! - [`Provisioner`]: runs the workflow against any [`XdOperations`]
//! - [`WaitPolicy`]: fixed pause or poll-until-settled
//! - [`CounterReport`]: top counts of one counter
//! - [`ClientConfig`]: layered configuration (CLI > env > TOML > defaults)
//!
//! # Quick Start
//!
//! ```ignore
//! use xd_client_core::{ProvisionConfig, Provisioner, XdRestClient};
//!
//! let client = XdRestClient::new("http://localhost:9393".parse()?)?;
//! let outcome = Provisioner::new(&client, ProvisionConfig::new("/tmp/xd/input"))
//!     .run()
//!     .await?;
//! for report in &outcome.reports {
//!     print!("{report}");
//! }
//! ```

pub mod api;
pub mod config;
pub mod pipeline;
pub mod provisioner;
pub mod readiness;
pub mod report;

pub use api::{
    ApiError, ContainerInfo, CounterDeletion, DeploymentProperties, FieldValueCounter,
    MetricInfo, RestClientConfig, StreamDefinition, XdOperations, XdRestClient,
};
pub use config::{
    load_config, load_config_from_path, ClientConfig, ConfigError, ConfigOverrides,
    ConfigSource, WaitMode,
};
pub use provisioner::{ProvisionConfig, ProvisionError, Provisioner, RunOutcome, Step};
pub use readiness::{PollConfig, Readiness, WaitPolicy};
pub use report::{top_counts, CounterReport, DEFAULT_TOP_N};
