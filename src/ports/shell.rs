//! Command runner port for spawning cloud CLI processes.

/// The captured result of a finished command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// The exit code of the process.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns the combined stdout and stderr text.
    ///
    /// The cloud CLIs write their tables to stdout and diagnostics to
    /// stderr; callers that only want "what the command printed" get
    /// both, stdout first.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        text.push_str(&self.stderr);
        text
    }

    /// Whether the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external commands.
///
/// Abstracting subprocess execution lets tests substitute scripted
/// outputs instead of talking to a real cloud.
pub trait CommandRunner: Send + Sync {
    /// Runs a command string in the system shell and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error only when the command cannot be spawned at all;
    /// a non-zero exit is reported through [`CommandOutput::exit_code`].
    fn run(&self, command: &str)
        -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    fn run(
        &self,
        command: &str,
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        (**self).run(command)
    }
}
