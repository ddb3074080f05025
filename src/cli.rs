//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `ironcheck`.
#[derive(Debug, Parser)]
#[command(name = "ironcheck", version, about = "Check bare-metal and virtual interoperability")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one scenario, or all of them, against the configured cloud.
    Run {
        /// Name of the scenario to run (see `list`).
        scenario: Option<String>,
        /// Run every registered scenario.
        #[arg(long)]
        all: bool,
        /// Path to the environment config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the registered scenarios.
    List,
}
