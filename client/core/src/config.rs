//! TOML Configuration File Support
//!
//! Configuration for the client, loaded from a TOML file at
//! `~/.config/xd-client/client.toml` and layered with environment variables
//! and command-line overrides.
//!
//! # Configuration Priority
//!
//! Highest first:
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [admin]
//! url = "http://localhost:9393"
//! request_timeout_secs = 30
//! page_size = 100
//!
//! [pipeline]
//! input_directory = "/tmp/xd/input"
//!
//! [report]
//! top = 10
//!
//! [readiness]
//! mode = "poll"
//! fixed_secs = 8
//! timeout_secs = 30
//! initial_backoff_ms = 250
//! max_backoff_ms = 4000
//! ```
//!
//! # Environment Variables
//!
//! - `XD_ADMIN_URL`: admin server URL
//! - `XD_INPUT_DIR`: directory the `words` stream reads from
//! - `XD_REPORT_TOP`: entries reported per counter
//! - `XD_WAIT_MODE`: `poll` or `fixed`
//! - `XD_WAIT_TIMEOUT_SECS`: poll timeout

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::RestClientConfig;
use crate::provisioner::ProvisionConfig;
use crate::readiness::{PollConfig, WaitPolicy, DEFAULT_FIXED_WAIT};
use crate::report::DEFAULT_TOP_N;

/// Admin server used when nothing else is configured
pub const DEFAULT_ADMIN_URL: &str = "http://localhost:9393";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Admin URL is not a usable URL
    #[error("Invalid admin URL '{value}': {reason}")]
    InvalidUrl {
        /// The configured value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Readiness wait mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitMode {
    /// Poll the counter until it settles
    #[default]
    Poll,
    /// Pause for a fixed duration
    Fixed,
}

impl fmt::Display for WaitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poll => write!(f, "poll"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

impl FromStr for WaitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poll" => Ok(Self::Poll),
            "fixed" => Ok(Self::Fixed),
            other => Err(format!("unknown wait mode '{other}' (expected poll or fixed)")),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Admin server section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminToml {
    /// Admin server URL
    pub url: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,

    /// Items requested per page on list endpoints
    pub page_size: Option<u32>,
}

/// Pipeline section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineToml {
    /// Directory the `words` stream reads files from
    pub input_directory: Option<PathBuf>,
}

/// Report section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportToml {
    /// Entries reported per counter
    pub top: Option<usize>,
}

/// Readiness section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessToml {
    /// `poll` or `fixed`
    pub mode: Option<WaitMode>,

    /// Pause length in fixed mode, seconds
    pub fixed_secs: Option<u64>,

    /// Poll timeout, seconds
    pub timeout_secs: Option<u64>,

    /// First poll delay, milliseconds
    pub initial_backoff_ms: Option<u64>,

    /// Poll delay cap, milliseconds
    pub max_backoff_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientToml {
    /// Admin server section
    pub admin: AdminToml,

    /// Pipeline section
    pub pipeline: PipelineToml,

    /// Report section
    pub report: ReportToml,

    /// Readiness section
    pub readiness: ReadinessToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved client configuration
///
/// Use [`load_config`] to load it with proper priority handling, then
/// [`ConfigOverrides::apply`] for command-line values.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Admin server URL, unparsed
    pub admin_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Items requested per page on list endpoints
    pub page_size: u32,

    /// Directory the `words` stream reads files from
    pub input_directory: Option<PathBuf>,

    /// Entries reported per counter
    pub top: usize,

    /// Readiness wait mode
    pub wait_mode: WaitMode,

    /// Pause length in fixed mode
    pub fixed_wait: Duration,

    /// Poll settings
    pub poll: PollConfig,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Highest-priority layer that set a value
    source: ConfigSource,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let rest = RestClientConfig::default();
        Self {
            admin_url: DEFAULT_ADMIN_URL.to_string(),
            request_timeout: rest.request_timeout,
            page_size: rest.page_size,
            input_directory: None,
            top: DEFAULT_TOP_N,
            wait_mode: WaitMode::default(),
            fixed_wait: DEFAULT_FIXED_WAIT,
            poll: PollConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ClientConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Parse the admin URL
    ///
    /// Only `http` and `https` URLs are accepted.
    pub fn admin_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.admin_url.trim()).map_err(|e| ConfigError::InvalidUrl {
            value: self.admin_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                value: self.admin_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    /// Get the input directory, which has no default
    pub fn input_directory(&self) -> Result<&Path, ConfigError> {
        self.input_directory.as_deref().ok_or_else(|| {
            ConfigError::ValidationError(
                "no input directory configured (set --input-dir, XD_INPUT_DIR or [pipeline] input_directory)"
                    .to_string(),
            )
        })
    }

    /// Wait policy for the configured mode
    #[must_use]
    pub fn wait_policy(&self) -> WaitPolicy {
        match self.wait_mode {
            WaitMode::Fixed => WaitPolicy::Fixed(self.fixed_wait),
            WaitMode::Poll => WaitPolicy::Poll(self.poll),
        }
    }

    /// HTTP settings for the REST client
    #[must_use]
    pub fn rest_client_config(&self) -> RestClientConfig {
        RestClientConfig {
            request_timeout: self.request_timeout,
            page_size: self.page_size,
        }
    }

    /// Settings for a provisioning run
    pub fn provision_config(&self) -> Result<ProvisionConfig, ConfigError> {
        Ok(ProvisionConfig::new(self.input_directory()?)
            .with_top(self.top)
            .with_wait(self.wait_policy()))
    }

    /// Check every value that has constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.admin_url()?;
        self.input_directory()?;

        if self.top == 0 {
            return Err(ConfigError::ValidationError(
                "report size must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if self.wait_mode == WaitMode::Poll {
            if self.poll.initial_backoff.is_zero() {
                return Err(ConfigError::ValidationError(
                    "initial backoff must be greater than zero".to_string(),
                ));
            }
            if self.poll.max_backoff < self.poll.initial_backoff {
                return Err(ConfigError::ValidationError(
                    "max backoff must not be below initial backoff".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/xd-client/client.toml` or
/// `~/.config/xd-client/client.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("xd-client").join("client.toml"))
}

/// Load configuration from the default file and the process environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the process environment
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ClientConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration from a specific path with an explicit environment lookup
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ClientConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ClientToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut ClientConfig, toml: &ClientToml) {
    if let Some(ref url) = toml.admin.url {
        config.admin_url = url.clone();
    }
    if let Some(secs) = toml.admin.request_timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(size) = toml.admin.page_size {
        config.page_size = size;
    }

    if toml.pipeline.input_directory.is_some() {
        config.input_directory = toml.pipeline.input_directory.clone();
    }

    if let Some(top) = toml.report.top {
        config.top = top;
    }

    if let Some(mode) = toml.readiness.mode {
        config.wait_mode = mode;
    }
    if let Some(secs) = toml.readiness.fixed_secs {
        config.fixed_wait = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.readiness.timeout_secs {
        config.poll.timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = toml.readiness.initial_backoff_ms {
        config.poll.initial_backoff = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.readiness.max_backoff_ms {
        config.poll.max_backoff = Duration::from_millis(ms);
    }
}

/// Apply environment variable overrides to the config
///
/// Unparseable numeric values are rejected rather than ignored.
fn apply_env_config<F>(config: &mut ClientConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env("XD_ADMIN_URL") {
        config.admin_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(dir) = env("XD_INPUT_DIR") {
        config.input_directory = Some(PathBuf::from(dir));
        config.source = ConfigSource::Env;
    }
    if let Some(top) = env("XD_REPORT_TOP") {
        config.top = parse_env("XD_REPORT_TOP", &top)?;
        config.source = ConfigSource::Env;
    }
    if let Some(mode) = env("XD_WAIT_MODE") {
        config.wait_mode = mode.parse().map_err(ConfigError::ValidationError)?;
        config.source = ConfigSource::Env;
    }
    if let Some(secs) = env("XD_WAIT_TIMEOUT_SECS") {
        config.poll.timeout = Duration::from_secs(parse_env("XD_WAIT_TIMEOUT_SECS", &secs)?);
        config.source = ConfigSource::Env;
    }
    Ok(())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("{key} has invalid value '{value}'")))
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Command-line overrides, applied after [`load_config`]
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Admin URL override
    pub admin_url: Option<String>,

    /// Input directory override
    pub input_directory: Option<PathBuf>,

    /// Report size override
    pub top: Option<usize>,

    /// Wait mode override
    pub wait_mode: Option<WaitMode>,

    /// Poll timeout override (seconds)
    pub wait_timeout_secs: Option<u64>,

    /// Request timeout override (seconds)
    pub request_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set admin URL override
    #[must_use]
    pub fn with_admin_url(mut self, url: impl Into<String>) -> Self {
        self.admin_url = Some(url.into());
        self
    }

    /// Set report size override
    #[must_use]
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = Some(top);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.admin_url.is_none()
            && self.input_directory.is_none()
            && self.top.is_none()
            && self.wait_mode.is_none()
            && self.wait_timeout_secs.is_none()
            && self.request_timeout_secs.is_none()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut ClientConfig) {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref url) = self.admin_url {
            config.admin_url = url.clone();
        }
        if let Some(ref dir) = self.input_directory {
            config.input_directory = Some(dir.clone());
        }
        if let Some(top) = self.top {
            config.top = top;
        }
        if let Some(mode) = self.wait_mode {
            config.wait_mode = mode;
        }
        if let Some(secs) = self.wait_timeout_secs {
            config.poll.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
