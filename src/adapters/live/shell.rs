//! Live command runner using `std::process::Command`.

use std::process::Command;

use crate::ports::shell::{CommandOutput, CommandRunner};

/// Command runner that executes via the system shell.
///
/// Commands are passed to `sh -c` as a single string because the cloud
/// CLI invocations carry quoted arguments (image names with spaces,
/// embedded SSH commands) that callers assemble as shell text.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        command: &str,
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new("sh").arg("-c").arg(command).output()?;
        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
