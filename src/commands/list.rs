//! `ironcheck list` command.

use crate::scenarios;

/// Execute the `list` command.
///
/// # Errors
///
/// Always succeeds; the `Result` keeps the handler signature uniform.
pub fn run() -> Result<(), String> {
    println!("Available scenarios:");
    for (name, _) in scenarios::all() {
        println!("  {name}");
    }
    Ok(())
}
