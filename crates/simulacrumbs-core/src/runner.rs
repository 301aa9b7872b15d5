//! The async loop that drives the arena.
//!
//! [`run_simulation`] wakes on a fixed interval, collects personality edits
//! from the frontend, runs one [`Arena::tick`], and hands the result back to
//! the frontend. It stops when the game ends, when the optional tick limit
//! is reached, or on Ctrl-C.
//!
//! Ticks themselves are synchronous and quick; the interval is the only
//! place this loop waits.

use simulacrumbs_types::AgentId;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::arena::{Arena, ArenaStatus, TickReport};
use crate::config::TimingConfig;
use crate::frontend::Frontend;

/// Why the simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// Fewer than two agents remain.
    GameOver {
        /// The last agent standing, if any.
        winner: Option<AgentId>,
    },
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// The process received Ctrl-C.
    Interrupted,
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// Total number of ticks executed by this loop.
    pub total_ticks: u64,
    /// The last tick report, if any tick ran.
    pub last_report: Option<TickReport>,
}

/// Run the arena until a termination condition is met.
pub async fn run_simulation(
    arena: &mut Arena,
    frontend: &mut dyn Frontend,
    timing: &TimingConfig,
) -> SimulationResult {
    let mut interval = tokio::time::interval(timing.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut listening = true;

    let mut total_ticks: u64 = 0;
    let mut last_report: Option<TickReport> = None;

    info!(
        agents = arena.agents().len(),
        tick_interval_ms = timing.tick_interval_ms,
        move_delay_ms = timing.move_delay_ms,
        max_ticks = timing.max_ticks,
        "Simulation starting"
    );

    loop {
        if let ArenaStatus::GameOver { winner } = arena.status() {
            return SimulationResult {
                end_reason: SimulationEndReason::GameOver { winner },
                total_ticks,
                last_report,
            };
        }

        if timing.max_ticks.is_some_and(|max| total_ticks >= max) {
            info!(max_ticks = timing.max_ticks, "Tick limit reached");
            return SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                total_ticks,
                last_report,
            };
        }

        tokio::select! {
            _ = interval.tick() => {}
            signal = &mut shutdown, if listening => {
                if let Err(e) = signal {
                    warn!(error = %e, "Could not listen for Ctrl-C, continuing without it");
                    listening = false;
                    continue;
                }
                info!("Interrupted");
                return SimulationResult {
                    end_reason: SimulationEndReason::Interrupted,
                    total_ticks,
                    last_report,
                };
            }
        }

        apply_personality_edits(arena, frontend);
        let report = arena.tick();
        total_ticks = total_ticks.saturating_add(1);
        frontend.render(arena, &report);
        last_report = Some(report);
    }
}

fn apply_personality_edits(arena: &mut Arena, frontend: &mut dyn Frontend) {
    let edits: Vec<(AgentId, String)> = arena
        .agents()
        .iter()
        .filter_map(|agent| frontend.personality_edit(agent).map(|p| (agent.id(), p)))
        .collect();

    for (id, personality) in edits {
        if arena.edit_personality(id, personality) {
            info!(agent = %id, "Personality updated");
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(arena: &Arena, result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        winner = arena.winner().map(|a| a.name().to_owned()),
        active = arena.active_count(),
        "Simulation ended"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use simulacrumbs_runner::{CompletionSource, PromptEngine, StubSource};
    use simulacrumbs_types::{Emotion, Position};

    use super::*;
    use crate::agent::Agent;
    use crate::config::ArenaConfig;
    use crate::frontend::HeadlessFrontend;
    use crate::pool::DecisionPool;

    fn arena(agent_count: usize) -> Option<Arena> {
        let source: Arc<dyn CompletionSource> = Arc::new(StubSource::default());
        let agents = (0..agent_count)
            .map(|i| {
                let x = 500_i32.saturating_add(i32::try_from(i).unwrap_or(0).saturating_mul(200));
                Agent::new(format!("agent{i}"), "You wait", Emotion::Angry, Arc::clone(&source))
                    .with_position(Position::new(x, 300))
            })
            .collect();
        let pool = DecisionPool::from_current(2)?;
        let prompts = PromptEngine::new().ok()?;
        Some(Arena::new(&ArenaConfig::default(), agents, pool, prompts))
    }

    fn fast_timing(max_ticks: Option<u64>) -> TimingConfig {
        TimingConfig {
            tick_interval_ms: 1,
            move_delay_ms: 0,
            max_ticks,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stops_at_tick_limit() {
        let Some(mut arena) = arena(2) else { return };
        let mut frontend = HeadlessFrontend::new();
        let result = run_simulation(&mut arena, &mut frontend, &fast_timing(Some(5))).await;

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(arena.tick_count(), 5);
        assert!(result.last_report.is_some_and(|r| r.tick == 5));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn finished_arena_runs_no_ticks() {
        let Some(mut arena) = arena(1) else { return };
        let winner = arena.agents().first().map(Agent::id);
        let mut frontend = HeadlessFrontend::new();
        let result = run_simulation(&mut arena, &mut frontend, &fast_timing(None)).await;

        assert_eq!(result.end_reason, SimulationEndReason::GameOver { winner });
        assert_eq!(result.total_ticks, 0);
        assert!(result.last_report.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn edits_are_applied_before_the_tick() {
        let Some(mut arena) = arena(2) else { return };
        let Some(id) = arena.agents().first().map(Agent::id) else { return };
        let mut frontend = HeadlessFrontend::new();
        frontend.queue_edit(id, "You are a poet");

        let _ = run_simulation(&mut arena, &mut frontend, &fast_timing(Some(1))).await;
        assert_eq!(arena.agent(id).map(Agent::personality), Some("You are a poet"));
    }
}
