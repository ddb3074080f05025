//! Fixed-interval polling for resource status transitions.
//!
//! Cloud resources move through provisioning states on their own
//! schedule; the only interface is re-running a show command and
//! re-reading its table. The wait loop here is an explicit state
//! machine with three distinguishable terminal outcomes, so callers
//! never have to infer a timeout by re-checking the status field.

use std::time::Duration;

use tracing::debug;

use crate::client::CliClient;
use crate::context::Runtime;
use crate::error::Error;
use crate::parser::{parse_details, DetailRecord};

/// Status value that short-circuits a wait as a failure, matched
/// case-insensitively.
const ERROR_SENTINEL: &str = "error";

/// Attempt budget and inter-attempt delay for a wait loop.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Maximum number of fetches before giving up.
    pub max_attempts: u32,
    /// Fixed delay between fetches.
    pub delay: Duration,
}

impl Default for PollConfig {
    /// The budget used against real clouds: 40 attempts, 15 seconds
    /// apart (ten minutes end to end).
    fn default() -> Self {
        Self { max_attempts: 40, delay: Duration::from_secs(15) }
    }
}

/// Terminal state of a wait loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The status field reached the expected value.
    Succeeded,
    /// The status field reported the error sentinel.
    Failed,
    /// The attempt budget ran out before either of the above.
    TimedOut,
}

/// Result of a completed wait, including the last record observed.
#[derive(Debug)]
pub struct WaitReport {
    /// How the wait ended.
    pub outcome: WaitOutcome,
    /// The record from the final fetch.
    pub record: DetailRecord,
    /// Number of fetches performed.
    pub attempts: u32,
}

/// Polls `show_cmd` until `record[status_key]` equals `expected`.
///
/// The expected value is matched case-sensitively. A status that
/// matches `"error"` case-insensitively fails the wait immediately,
/// without spending the remaining budget. A record missing the status
/// key counts as a non-match and keeps polling.
///
/// # Errors
///
/// Propagates executor and parser errors from any fetch; the wait
/// itself never errors, it reports through [`WaitReport::outcome`].
pub fn wait_for_status(
    ctx: &Runtime,
    show_cmd: &str,
    status_key: &str,
    expected: &str,
    config: &PollConfig,
) -> Result<WaitReport, Error> {
    let client = CliClient::new(ctx);
    let mut attempts = 0;
    loop {
        attempts += 1;
        let text = client.execute(show_cmd, false)?;
        let record = parse_details(&text)?;
        let status = record.get(status_key).map(String::as_str);

        if status == Some(expected) {
            debug!(show_cmd, status_key, attempts, "status reached expected value");
            return Ok(WaitReport { outcome: WaitOutcome::Succeeded, record, attempts });
        }
        if status.is_some_and(|s| s.eq_ignore_ascii_case(ERROR_SENTINEL)) {
            debug!(show_cmd, status_key, attempts, "status reported error, failing fast");
            return Ok(WaitReport { outcome: WaitOutcome::Failed, record, attempts });
        }
        if attempts >= config.max_attempts {
            debug!(show_cmd, status_key, attempts, "attempt budget exhausted");
            return Ok(WaitReport { outcome: WaitOutcome::TimedOut, record, attempts });
        }
        ctx.sleeper.sleep(config.delay);
    }
}

/// Polls `show_cmd` until it fails, treating the failure as proof the
/// resource is gone.
///
/// The command failure is suppressed; a resource that still resolves
/// after the budget times out.
///
/// # Errors
///
/// Propagates spawn failures; a non-zero exit is the success signal,
/// never an error.
pub fn wait_for_deletion(
    ctx: &Runtime,
    show_cmd: &str,
    config: &PollConfig,
) -> Result<WaitOutcome, Error> {
    let client = CliClient::new(ctx);
    let mut attempts = 0;
    loop {
        attempts += 1;
        match client.execute(show_cmd, false) {
            Err(Error::CommandFailed { .. }) => {
                debug!(show_cmd, attempts, "resource no longer resolves, treating as deleted");
                return Ok(WaitOutcome::Succeeded);
            }
            Err(other) => return Err(other),
            Ok(_) if attempts >= config.max_attempts => {
                debug!(show_cmd, attempts, "resource still present after budget");
                return Ok(WaitOutcome::TimedOut);
            }
            Ok(_) => ctx.sleeper.sleep(config.delay),
        }
    }
}
