//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use xd_client_core::{ConfigOverrides, WaitMode};

/// Provision the wordcount streams on a Spring XD admin server and report the
/// most frequent words
#[derive(Parser, Debug)]
#[command(name = "xd-client")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Admin server URL (overrides XD_ADMIN_URL and the config file)
    #[arg(short = 'u', long, value_name = "URL")]
    pub admin_url: Option<String>,

    /// Directory the words stream reads text files from
    #[arg(short = 'i', long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "XD_CLIENT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Entries reported per counter
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    /// How to wait for counter data: poll or fixed
    #[arg(short = 'w', long, value_name = "MODE")]
    pub wait: Option<WaitMode>,

    /// Give up polling the counter after this many seconds
    #[arg(long, value_name = "SECS")]
    pub wait_timeout_secs: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Log level when RUST_LOG is not set
    #[arg(short = 'l', long, env = "XD_CLIENT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Configuration overrides given on the command line
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            admin_url: self.admin_url.clone(),
            input_directory: self.input_dir.clone(),
            top: self.top,
            wait_mode: self.wait,
            wait_timeout_secs: self.wait_timeout_secs,
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}
