//! `simulacrumbs` binary.
//!
//! Wires configuration, the completion source, the prompt engine and the
//! worker pool into an [`Arena`] for the chosen game, then runs the tick
//! loop with the headless frontend until the game ends.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Parse arguments and load `simulacrumbs-config.yaml`
//! 3. Pick a completion source: the LLM backend from the environment, or
//!    the offline stub
//! 4. Load prompt templates
//! 5. Spawn the scenario's agents and build the arena
//! 6. Run the simulation loop
//! 7. Log the result

mod cli;
mod error;

use std::sync::Arc;

use clap::Parser;
use simulacrumbs_core::{
    Arena, DecisionPool, HeadlessFrontend, SimulationConfig, log_simulation_end, populate,
    run_simulation, seeded_rng,
};
use simulacrumbs_runner::{
    CompletionSource, PromptEngine, RunnerConfig, StubSource, create_backend,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, backend or template setup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let cli = Cli::parse();
    let scenario = cli.command.scenario();
    info!(game = scenario.title(), "simulacrumbs starting");

    let mut config = SimulationConfig::load_or_default(&cli.config).map_err(CliError::from)?;
    if cli.max_ticks.is_some() {
        config.timing.max_ticks = cli.max_ticks;
    }
    info!(
        width = config.arena.width,
        height = config.arena.height,
        workers = config.workers,
        seed = config.seed,
        "Configuration loaded"
    );

    let (source, templates_dir) = completion_source(cli.offline)?;
    info!(source = source.name(), "Completion source ready");

    let prompts = match templates_dir {
        Some(dir) => PromptEngine::from_dir(&dir),
        None => PromptEngine::new(),
    }
    .map_err(CliError::from)?;

    let pool = DecisionPool::from_current(config.workers).ok_or(CliError::NoRuntime)?;
    let mut rng = seeded_rng(config.seed);
    let agents = populate(&scenario.roster(), &source, &config, &mut rng);
    let mut arena = Arena::new(&config.arena, agents, pool, prompts);

    let mut frontend = HeadlessFrontend::new();
    let result = run_simulation(&mut arena, &mut frontend, &config.timing).await;
    log_simulation_end(&arena, &result);

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` filters (default `info`);
/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// The completion source for this run, plus any template override
/// directory from the environment.
fn completion_source(
    offline: bool,
) -> Result<(Arc<dyn CompletionSource>, Option<String>), CliError> {
    if offline {
        let templates_dir = RunnerConfig::templates_dir_from_env();
        return Ok((Arc::new(StubSource::default()), templates_dir));
    }
    let config = RunnerConfig::from_env()?;
    info!(
        backend = ?config.backend.backend_type,
        model = %config.backend.model,
        "LLM backend configured"
    );
    Ok((Arc::new(create_backend(&config.backend)), config.templates_dir))
}
