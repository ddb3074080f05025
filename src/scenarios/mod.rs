//! Interoperability scenarios and their registry.

pub mod network;
pub mod region;
pub mod support;

use crate::config::Config;
use crate::context::Runtime;

/// Signature every scenario entry point shares.
pub type ScenarioFn = fn(&Runtime, &Config) -> Result<(), String>;

/// All registered scenarios, in run order.
#[must_use]
pub fn all() -> Vec<(&'static str, ScenarioFn)> {
    vec![("mixed-network", network::run as ScenarioFn), ("region", region::run as ScenarioFn)]
}

/// Looks up a scenario by name.
#[must_use]
pub fn find(name: &str) -> Option<ScenarioFn> {
    all().into_iter().find(|(n, _)| *n == name).map(|(_, f)| f)
}
