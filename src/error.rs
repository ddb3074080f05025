//! Error taxonomy for the executor and parser core.

use thiserror::Error;

/// Failures surfaced by the command executor and output parser.
#[derive(Debug, Error)]
pub enum Error {
    /// A command exited non-zero and the caller did not allow failure.
    ///
    /// Carries the captured combined output so assertion failures can
    /// show what the CLI actually printed.
    #[error("command `{command}` exited with status {status}:\n{output}")]
    CommandFailed {
        /// The command string that was run.
        command: String,
        /// The process exit status.
        status: i32,
        /// Combined stdout and stderr of the failed command.
        output: String,
    },

    /// A command could not be spawned at all.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// The command string that was run.
        command: String,
        /// The underlying spawn failure.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// CLI output did not match the expected table shape.
    #[error("failed to parse CLI output: {0}")]
    Parse(String),
}

impl Error {
    /// Whether this error is a non-zero command exit.
    #[must_use]
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Error::CommandFailed { .. })
    }
}
