//! Counter Readiness
//!
//! Waiting for the counting stream to have processed input before the
//! counters are read. Two policies:
//!
//! - [`WaitPolicy::Fixed`]: pause once for a fixed duration.
//! - [`WaitPolicy::Poll`]: poll the counter with exponential backoff until it
//!   is non-empty and its total stops changing between two observations, or
//!   until the timeout elapses.
//!
//! A poll timeout is not an error; the caller reports whatever exists.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{ApiError, XdOperations};

/// Default pause for [`WaitPolicy::Fixed`]
pub const DEFAULT_FIXED_WAIT: Duration = Duration::from_secs(8);

/// Deadline used when the configured timeout does not fit on the clock
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Polling settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Give up after this long
    pub timeout: Duration,
    /// Delay after the first observation
    pub initial_backoff: Duration,
    /// Upper bound for the doubling delay
    pub max_backoff: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(4),
        }
    }
}

/// How to wait for counter data
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitPolicy {
    /// Pause once for this long
    Fixed(Duration),
    /// Poll until the counter settles
    Poll(PollConfig),
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::Poll(PollConfig::default())
    }
}

/// How the wait ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Fixed pause completed
    Waited(Duration),
    /// Counter was non-empty and unchanged between two observations
    Settled {
        /// Counter retrievals performed
        attempts: u32,
    },
    /// Timeout elapsed before the counter settled
    TimedOut {
        /// Counter retrievals performed
        attempts: u32,
    },
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waited(d) => write!(f, "waited {}ms", d.as_millis()),
            Self::Settled { attempts } => write!(f, "settled after {attempts} poll(s)"),
            Self::TimedOut { attempts } => write!(f, "timed out after {attempts} poll(s)"),
        }
    }
}

/// Wait for `counter` according to `policy`
///
/// Only errors other than "not found" from counter retrieval are returned.
pub async fn wait_for_counter<O>(
    ops: &O,
    counter: &str,
    policy: &WaitPolicy,
) -> Result<Readiness, ApiError>
where
    O: XdOperations + ?Sized,
{
    match policy {
        WaitPolicy::Fixed(duration) => {
            info!(duration = ?duration, "Waiting for words to be counted");
            tokio::time::sleep(*duration).await;
            Ok(Readiness::Waited(*duration))
        }
        WaitPolicy::Poll(config) => poll_until_settled(ops, counter, config).await,
    }
}

async fn poll_until_settled<O>(
    ops: &O,
    counter: &str,
    config: &PollConfig,
) -> Result<Readiness, ApiError>
where
    O: XdOperations + ?Sized,
{
    info!(
        counter = counter,
        timeout = ?config.timeout,
        "Polling counter until it settles"
    );

    let deadline = deadline_after(Instant::now(), config.timeout);
    let mut backoff = config.initial_backoff;
    let mut last_total: Option<f64> = None;
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        match ops.retrieve_counter(counter).await {
            Ok(observed) if !observed.is_empty() => {
                let total = observed.total();
                if last_total == Some(total) {
                    info!(counter = counter, attempts, total, "Counter settled");
                    return Ok(Readiness::Settled { attempts });
                }
                debug!(counter = counter, attempts, total, "Counter still changing");
                last_total = Some(total);
            }
            Ok(_) => {
                debug!(counter = counter, attempts, "Counter empty");
                last_total = None;
            }
            Err(e) if e.is_not_found() => {
                debug!(counter = counter, attempts, "Counter not created yet");
                last_total = None;
            }
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(counter = counter, attempts, "Counter did not settle before timeout");
            return Ok(Readiness::TimedOut { attempts });
        }

        // Exponential backoff between poll attempts, capped by the deadline
        let delay = backoff.min(deadline - now);
        tokio::time::sleep(delay).await;
        backoff = backoff.saturating_mul(2).min(config.max_backoff);
    }
}

/// `start + timeout`, saturating at a far-future instant
fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}
