//! Best-effort deletion of resources provisioned during a scenario.

use tracing::{info, warn};

use crate::client::CliClient;
use crate::context::Runtime;

/// Environment variable that suppresses cleanup when set to `"true"`
/// (case-insensitive). Any other value, including unset, cleans up.
pub const SKIP_CLEANUP_VAR: &str = "SKIP_CLEANUP";

/// Delete commands accumulated while a scenario provisions resources.
///
/// Drained at teardown in reverse order of registration, so dependent
/// resources go before the things they depend on. Failures are logged
/// and swallowed; a cleanup error must never mask the scenario's own
/// result.
#[derive(Debug, Default)]
pub struct CleanupList {
    commands: Vec<String>,
}

impl CleanupList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a delete command to run at teardown.
    pub fn register(&mut self, command: String) {
        self.commands.push(command);
    }

    /// Number of registered delete commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no delete commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs every registered delete command, newest first, unless the
    /// `SKIP_CLEANUP` environment variable requests otherwise.
    pub fn drain(self, ctx: &Runtime) {
        if cleanup_skipped() {
            info!("{SKIP_CLEANUP_VAR} is set, leaving {} resource(s) in place", self.len());
            return;
        }
        let client = CliClient::new(ctx);
        for command in self.commands.into_iter().rev() {
            if let Err(err) = client.execute(&command, true) {
                warn!(%command, "cleanup command could not run: {err}");
            }
        }
    }
}

/// Whether the current environment asks to skip the deletion pass.
#[must_use]
pub fn cleanup_skipped() -> bool {
    skip_requested(std::env::var(SKIP_CLEANUP_VAR).ok().as_deref())
}

/// Whether a `SKIP_CLEANUP` value asks to skip the deletion pass.
fn skip_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
