//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simulacrumbs_core::Scenario;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "simulacrumbs-config.yaml";

/// LLM agents wandering an arena, trying to change each other's mood.
#[derive(Debug, Parser)]
#[command(name = "simulacrumbs", version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML simulation config (defaults apply if missing).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Use a canned reply instead of calling an LLM backend.
    #[arg(long)]
    pub offline: bool,

    /// Stop after this many ticks (overrides the config file).
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// Game to play.
    #[command(subcommand)]
    pub command: Command,
}

/// Available games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// A warrior and a ballerina try to upset each other.
    Warrior,
    /// Three housemates share a flat.
    Sims,
}

impl Command {
    /// The roster this command starts.
    pub const fn scenario(self) -> Scenario {
        match self {
            Self::Warrior => Scenario::Warrior,
            Self::Sims => Scenario::Sims,
        }
    }
}
