//! Command dispatch and handlers.

pub mod list;
pub mod run;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Run { scenario, all, config } => {
            run::run(scenario.as_deref(), *all, config.as_deref())
        }
        Command::List => list::run(),
    }
}
