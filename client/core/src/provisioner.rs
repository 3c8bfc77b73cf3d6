//! Provisioning Workflow
//!
//! Sets up the wordcount pipeline on the admin server and reports the top
//! counter values. The run is strictly sequential:
//!
//! ```text
//! diagnose -> remove old streams -> delete old counter -> create words
//!          -> create wordcount (auto-deploy) -> deploy words -> wait -> report
//! ```
//!
//! Any failed remote call ends the run with the step that failed. Nothing is
//! rolled back. The only tolerated failure is deleting a counter that does
//! not exist.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, CounterDeletion, DeploymentProperties, XdOperations};
use crate::pipeline::{
    is_managed_stream, word_stream_definition, WORDCOUNT_COUNTER, WORDCOUNT_STREAM,
    WORDCOUNT_STREAM_DEFINITION, WORD_STREAM,
};
use crate::readiness::{wait_for_counter, Readiness, WaitPolicy};
use crate::report::{CounterReport, DEFAULT_TOP_N};

/// Workflow step, used to say where a run failed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Listing running containers
    ListContainers,
    /// Listing existing streams
    ListStreams,
    /// Undeploying an existing stream
    Undeploy(String),
    /// Destroying an existing stream
    Destroy(String),
    /// Deleting the previous counter
    DeleteCounter(String),
    /// Creating a stream
    Create(String),
    /// Deploying a stream
    Deploy(String),
    /// Waiting for counter data
    Wait,
    /// Listing counters
    ListCounters,
    /// Retrieving a counter
    RetrieveCounter(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListContainers => write!(f, "list containers"),
            Self::ListStreams => write!(f, "list streams"),
            Self::Undeploy(name) => write!(f, "undeploy stream {name}"),
            Self::Destroy(name) => write!(f, "destroy stream {name}"),
            Self::DeleteCounter(name) => write!(f, "delete counter {name}"),
            Self::Create(name) => write!(f, "create stream {name}"),
            Self::Deploy(name) => write!(f, "deploy stream {name}"),
            Self::Wait => write!(f, "wait for counter data"),
            Self::ListCounters => write!(f, "list counters"),
            Self::RetrieveCounter(name) => write!(f, "retrieve counter {name}"),
        }
    }
}

/// A provisioning run failed
#[derive(Debug, Error)]
#[error("Failed to {step}: {source}")]
pub struct ProvisionError {
    /// Step that failed
    pub step: Step,
    /// Underlying API error
    #[source]
    pub source: ApiError,
}

trait StepContext<T> {
    fn step(self, step: Step) -> Result<T, ProvisionError>;
}

impl<T> StepContext<T> for Result<T, ApiError> {
    fn step(self, step: Step) -> Result<T, ProvisionError> {
        self.map_err(|source| ProvisionError { step, source })
    }
}

/// Settings of one provisioning run
#[derive(Clone, Debug)]
pub struct ProvisionConfig {
    /// Directory the `words` stream reads files from
    pub input_dir: PathBuf,
    /// Entries reported per counter
    pub top: usize,
    /// How to wait for counter data
    pub wait: WaitPolicy,
}

impl ProvisionConfig {
    /// Create settings with the default report size and wait policy
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            top: DEFAULT_TOP_N,
            wait: WaitPolicy::default(),
        }
    }

    /// Set the number of entries reported per counter
    #[must_use]
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// Set the wait policy
    #[must_use]
    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }
}

/// What a successful run did
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// Containers seen at start
    pub containers: usize,
    /// Streams torn down before provisioning
    pub removed_streams: Vec<String>,
    /// Result of deleting the previous counter
    pub counter_deletion: CounterDeletion,
    /// How the wait for data ended
    pub readiness: Readiness,
    /// One report per counter on the server
    pub reports: Vec<CounterReport>,
}

/// Runs the wordcount provisioning workflow against an admin server
pub struct Provisioner<'a, O: XdOperations + ?Sized> {
    ops: &'a O,
    config: ProvisionConfig,
}

impl<'a, O: XdOperations + ?Sized> Provisioner<'a, O> {
    /// Create a provisioner using `ops` for every remote call
    pub fn new(ops: &'a O, config: ProvisionConfig) -> Self {
        Self { ops, config }
    }

    /// Run every step in order
    pub async fn run(&self) -> Result<RunOutcome, ProvisionError> {
        let containers = self.log_containers().await?;
        let removed_streams = self.remove_existing_streams().await?;
        let counter_deletion = self.delete_previous_counter().await?;
        self.create_streams().await?;

        let readiness = wait_for_counter(self.ops, WORDCOUNT_COUNTER, &self.config.wait)
            .await
            .step(Step::Wait)?;

        let reports = self.report().await?;

        Ok(RunOutcome {
            containers,
            removed_streams,
            counter_deletion,
            readiness,
            reports,
        })
    }

    async fn log_containers(&self) -> Result<usize, ProvisionError> {
        let containers = self
            .ops
            .list_containers()
            .await
            .step(Step::ListContainers)?;
        for container in &containers {
            info!("Container running: {container}");
        }
        if containers.is_empty() {
            warn!("No containers running, streams will not process data");
        }
        Ok(containers.len())
    }

    /// Undeploy and destroy managed streams left from a previous run
    async fn remove_existing_streams(&self) -> Result<Vec<String>, ProvisionError> {
        info!(
            "Check if streams {} and {} are already existing...",
            WORD_STREAM, WORDCOUNT_STREAM
        );
        let streams = self.ops.list_streams().await.step(Step::ListStreams)?;

        let mut removed = Vec::new();
        for stream in streams.iter().filter(|s| is_managed_stream(&s.name)) {
            let name = stream.name.as_str();
            info!("Undeploy/destroy stream {name}...");
            self.ops
                .undeploy_stream(name)
                .await
                .step(Step::Undeploy(name.to_string()))?;
            self.ops
                .destroy_stream(name)
                .await
                .step(Step::Destroy(name.to_string()))?;
            removed.push(name.to_string());
        }
        Ok(removed)
    }

    async fn delete_previous_counter(&self) -> Result<CounterDeletion, ProvisionError> {
        let deletion = self
            .ops
            .delete_counter(WORDCOUNT_COUNTER)
            .await
            .step(Step::DeleteCounter(WORDCOUNT_COUNTER.to_string()))?;
        match deletion {
            CounterDeletion::Deleted => info!("Counter {WORDCOUNT_COUNTER} deleted"),
            CounterDeletion::NotFound => info!("Counter {WORDCOUNT_COUNTER} does not exist"),
        }
        Ok(deletion)
    }

    /// Create `words`, create and auto-deploy `wordcount`, then deploy `words`
    async fn create_streams(&self) -> Result<(), ProvisionError> {
        let word_definition = word_stream_definition(&self.config.input_dir);

        info!("Creating stream {WORD_STREAM}");
        self.ops
            .create_stream(WORD_STREAM, &word_definition, false)
            .await
            .step(Step::Create(WORD_STREAM.to_string()))?;

        info!("Creating stream {WORDCOUNT_STREAM}");
        self.ops
            .create_stream(WORDCOUNT_STREAM, WORDCOUNT_STREAM_DEFINITION, true)
            .await
            .step(Step::Create(WORDCOUNT_STREAM.to_string()))?;

        info!("Deploy stream {WORD_STREAM}");
        self.ops
            .deploy_stream(WORD_STREAM, &DeploymentProperties::new())
            .await
            .step(Step::Deploy(WORD_STREAM.to_string()))?;

        Ok(())
    }

    async fn report(&self) -> Result<Vec<CounterReport>, ProvisionError> {
        let counters = self.ops.list_counters().await.step(Step::ListCounters)?;

        let mut reports = Vec::with_capacity(counters.len());
        for metric in &counters {
            info!("List values of counter '{}'...", metric.name);
            let counter = self
                .ops
                .retrieve_counter(&metric.name)
                .await
                .step(Step::RetrieveCounter(metric.name.clone()))?;
            let report = CounterReport::from_counter(&counter, self.config.top);
            for (field, count) in &report.entries {
                info!("'{field}' = {count}");
            }
            reports.push(report);
        }
        Ok(reports)
    }
}
