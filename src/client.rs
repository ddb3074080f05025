//! Command executor wrapping the runner port.

use std::time::Duration;

use tracing::{debug, warn};

use crate::context::Runtime;
use crate::error::Error;

/// Executes cloud CLI commands through a [`Runtime`].
///
/// All subprocess work goes through `ctx.runner` so the client works
/// identically with live and scripted adapters.
pub struct CliClient<'a> {
    ctx: &'a Runtime,
}

impl<'a> CliClient<'a> {
    /// Creates a client over the given runtime.
    #[must_use]
    pub fn new(ctx: &'a Runtime) -> Self {
        Self { ctx }
    }

    /// Runs `command` and returns its combined stdout and stderr text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] when the process exits non-zero
    /// and `allow_failure` is false, and [`Error::Spawn`] when the
    /// process cannot be started. With `allow_failure` set, a non-zero
    /// exit still returns the captured output.
    pub fn execute(&self, command: &str, allow_failure: bool) -> Result<String, Error> {
        debug!(command, "executing");
        let output = self.ctx.runner.run(command).map_err(|source| Error::Spawn {
            command: command.to_string(),
            source,
        })?;
        let text = output.combined();
        if !output.success() && !allow_failure {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                status: output.exit_code,
                output: text,
            });
        }
        Ok(text)
    }

    /// Runs `command`, retrying on failure up to `max_attempts` times
    /// with a fixed `delay` between attempts.
    ///
    /// No backoff growth: the operations this waits on (SSH becoming
    /// reachable on a freshly provisioned node) converge on their own
    /// schedule and a fixed interval keeps the budget predictable.
    ///
    /// # Errors
    ///
    /// Propagates the final failure once the attempt budget is exhausted.
    pub fn execute_with_retry(
        &self,
        command: &str,
        max_attempts: u32,
        delay: Duration,
    ) -> Result<String, Error> {
        let mut attempt = 1;
        loop {
            match self.execute(command, false) {
                Ok(text) => return Ok(text),
                Err(err) if attempt < max_attempts => {
                    warn!(command, attempt, "command failed, retrying: {err}");
                    attempt += 1;
                    self.ctx.sleeper.sleep(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
