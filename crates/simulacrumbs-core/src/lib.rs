//! Agent decision loop, arena coordinator and tick cycle for Simulacrumbs.
//!
//! A fixed roster of agents shares a bounded arena. Each tick the
//! coordinator tells every agent where the others are, lets each agent
//! advance its decision state machine, keeps everyone inside the walls, and
//! settles encounters: agents standing together overhear each other, and an
//! agent whose mood matches a neighbour's goal is knocked out. The game ends
//! when fewer than two agents remain.
//!
//! Model calls never block a tick. They run on a small worker pool and are
//! polled once per tick.
//!
//! # Modules
//!
//! - [`agent`] -- Agent state, the per-agent decision slot, and movement.
//! - [`arena`] -- The coordinator that owns the roster and runs ticks.
//! - [`config`] -- YAML simulation configuration.
//! - [`frontend`] -- The render/input seam and a headless implementation.
//! - [`perception`] -- Relative positions and per-agent world context.
//! - [`pool`] -- Bounded worker pool for model calls.
//! - [`runner`] -- The async loop that drives ticks on an interval.
//! - [`scenario`] -- Built-in rosters (`warrior`, `sims`).

pub mod agent;
pub mod arena;
pub mod config;
pub mod frontend;
pub mod perception;
pub mod pool;
pub mod runner;
pub mod scenario;

pub use agent::{Agent, DecisionContext, SlotState};
pub use arena::{Arena, ArenaStatus, TickReport};
pub use config::{ArenaConfig, ConfigError, SimulationConfig, SpawnRange, TimingConfig};
pub use frontend::{Frontend, HeadlessFrontend, history_panel};
pub use pool::{DecisionPool, PendingDecision};
pub use runner::{SimulationEndReason, SimulationResult, log_simulation_end, run_simulation};
pub use scenario::{AgentSpec, Scenario, populate, seeded_rng};
