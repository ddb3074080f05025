//! Runtime context bundling the port trait objects.

use crate::ports::clock::Sleeper;
use crate::ports::shell::CommandRunner;

/// Bundles the port trait objects a scenario needs.
///
/// Constructors wire up different adapter implementations: `live` for
/// real runs against a cloud, `scripted` for deterministic tests.
pub struct Runtime {
    /// Runner for external cloud CLI commands.
    pub runner: Box<dyn CommandRunner>,
    /// Sleeper for polling delays.
    pub sleeper: Box<dyn Sleeper>,
}

impl Runtime {
    /// Creates a live runtime that spawns real processes and really sleeps.
    #[must_use]
    pub fn live() -> Self {
        use crate::adapters::live::{SystemRunner, ThreadSleeper};

        Self { runner: Box::new(SystemRunner), sleeper: Box::new(ThreadSleeper) }
    }

    /// Creates a runtime from explicit adapter implementations.
    #[must_use]
    pub fn new(runner: Box<dyn CommandRunner>, sleeper: Box<dyn Sleeper>) -> Self {
        Self { runner, sleeper }
    }

    /// Creates a scripted runtime replaying `outputs`, with instant sleeps.
    #[must_use]
    pub fn scripted(outputs: Vec<crate::ports::shell::CommandOutput>) -> Self {
        use crate::adapters::scripted::{InstantSleeper, ScriptedRunner};

        Self {
            runner: Box::new(ScriptedRunner::new(outputs)),
            sleeper: Box::new(InstantSleeper::new()),
        }
    }
}
