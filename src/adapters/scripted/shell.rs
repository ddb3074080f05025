//! Scripted command runner replaying canned outputs.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::shell::{CommandOutput, CommandRunner};

/// Command runner that replays a fixed sequence of outputs.
///
/// Each call to [`CommandRunner::run`] pops the next scripted output and
/// records the command string it was asked to run. Running past the end
/// of the script is an error, which surfaces a test that issues more
/// commands than it scripted.
pub struct ScriptedRunner {
    script: Mutex<VecDeque<CommandOutput>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    /// Creates a runner that will replay `outputs` in order.
    #[must_use]
    pub fn new(outputs: Vec<CommandOutput>) -> Self {
        Self { script: Mutex::new(outputs.into()), seen: Mutex::new(Vec::new()) }
    }

    /// A scripted output for a command that succeeded with `text` on stdout.
    #[must_use]
    pub fn ok(text: &str) -> CommandOutput {
        CommandOutput { exit_code: 0, stdout: text.to_string(), stderr: String::new() }
    }

    /// A scripted output for a command that failed with `exit_code`,
    /// printing `text` on stderr.
    #[must_use]
    pub fn failed(exit_code: i32, text: &str) -> CommandOutput {
        CommandOutput { exit_code, stdout: String::new(), stderr: text.to_string() }
    }

    /// The command strings run so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        command: &str,
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        self.seen.lock().unwrap().push(command.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| format!("scripted runner exhausted on command: {command}").into())
    }
}
