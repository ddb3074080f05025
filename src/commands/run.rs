//! `ironcheck run` command.

use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::context::Runtime;
use crate::scenarios::{self, ScenarioFn};

/// Execute the `run` command against a live cloud.
///
/// # Errors
///
/// Returns an error string when no scenario is selected, the config
/// cannot be loaded, an unknown scenario is named, or any selected
/// scenario fails.
pub fn run(scenario: Option<&str>, all: bool, config_path: Option<&Path>) -> Result<(), String> {
    let selected = select(scenario, all)?;
    let path = config_path.map_or_else(Config::default_path, Path::to_path_buf);
    let config = Config::load(&path)?;
    let ctx = Runtime::live();
    run_selected(&ctx, &config, &selected)
}

/// Resolve the scenario selection into named run functions.
fn select(scenario: Option<&str>, all: bool) -> Result<Vec<(&'static str, ScenarioFn)>, String> {
    if all {
        return Ok(scenarios::all());
    }
    let Some(name) = scenario else {
        return Err("Provide a scenario name or --all (see `ironcheck list`)".to_string());
    };
    match scenarios::all().into_iter().find(|(n, _)| *n == name) {
        Some(entry) => Ok(vec![entry]),
        None => Err(format!("Unknown scenario `{name}` (see `ironcheck list`)")),
    }
}

/// Run the selected scenarios in order, reporting each outcome.
fn run_selected(
    ctx: &Runtime,
    config: &Config,
    selected: &[(&'static str, ScenarioFn)],
) -> Result<(), String> {
    let mut failures = Vec::new();
    for (name, scenario_fn) in selected {
        info!(name, "starting scenario");
        match scenario_fn(ctx, config) {
            Ok(()) => println!("PASS {name}"),
            Err(err) => {
                println!("FAIL {name}: {err}");
                failures.push(*name);
            }
        }
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} scenario(s) failed: {}", failures.len(), failures.join(", ")))
    }
}
