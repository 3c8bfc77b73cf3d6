//! XD Client - Wordcount Demo Provisioner
//!
//! Sets up the `words` and `wordcount` streams on a Spring XD admin server,
//! waits for words to be counted and prints the most frequent ones.
//!
//! # Usage
//!
//! ```bash
//! # Admin server on localhost:9393
//! xd-client --input-dir /tmp/xd/input
//!
//! # Remote admin server, original fixed 8 second wait
//! xd-client -u http://xd-admin:9393 -i /data/words --wait fixed
//!
//! # With config file
//! xd-client --config ~/.config/xd-client/client.toml
//!
//! # Verbose logging
//! RUST_LOG=debug xd-client -i /tmp/xd/input
//! ```
//!
//! # Environment Variables
//!
//! - `XD_ADMIN_URL`: admin server URL
//! - `XD_INPUT_DIR`: input directory for the `words` stream
//! - `XD_CLIENT_CONFIG`: configuration file path
//! - `RUST_LOG`: log filter (trace, debug, info, warn, error)
//!
//! Logs go to stderr, the counter report to stdout. Any failed remote call
//! ends the process with a non-zero exit status.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use xd_client_core::{config, Provisioner, XdRestClient};

use cli::Args;

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("xd_client={level},xd_client_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let mut client_config = match args.config {
        Some(ref path) => {
            if !path.exists() {
                anyhow::bail!("Config file {} does not exist", path.display());
            }
            config::load_config_from_path(Some(path.clone()))
        }
        None => config::load_config(),
    }
    .context("Failed to load configuration")?;
    args.overrides().apply(&mut client_config);
    client_config
        .validate()
        .context("Invalid configuration")?;

    let admin_url = client_config.admin_url()?;
    let provision_config = client_config.provision_config()?;

    info!(
        admin_url = %admin_url,
        input_dir = %provision_config.input_dir.display(),
        source = %client_config.source(),
        config_file = ?client_config.config_file_path,
        "Using admin server"
    );

    let client = XdRestClient::with_config(admin_url, &client_config.rest_client_config())
        .context("Failed to create admin client")?;

    let outcome = Provisioner::new(&client, provision_config)
        .run()
        .await
        .context("Provisioning failed")?;

    info!(
        containers = outcome.containers,
        removed = outcome.removed_streams.len(),
        readiness = %outcome.readiness,
        "Provisioning complete"
    );

    for report in &outcome.reports {
        println!("Counter '{}':", report.counter);
        print!("{report}");
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("XD client starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let result = run(args).await;
    if let Err(ref e) = result {
        error!(error = %format!("{e:#}"), "Run aborted");
    }
    result
}
