//! The arena coordinator.
//!
//! [`Arena`] owns the roster and runs one synchronous tick at a time:
//!
//! 1. Skip everything if the game is already over.
//! 2. Render each agent's world context.
//! 3. Advance each active agent's decision slot, in roster order.
//! 4. Clamp every position into bounds.
//! 5. Settle encounters: agents at the same spot overhear each other's
//!    latest speech, and a listener whose latest emotion matches the
//!    speaker's goal is eliminated.
//! 6. End the game when fewer than two agents remain active.
//!
//! Eliminations from step 5 are collected over every pair before any of
//! them is applied, so the outcome does not depend on roster order.

use std::fmt;
use std::time::Instant;

use simulacrumbs_runner::PromptEngine;
use simulacrumbs_types::{AgentId, Bounds, Decision, Emotion, Position};
use tracing::{info, warn};

use crate::agent::{Agent, DecisionContext};
use crate::config::ArenaConfig;
use crate::perception::{is_same_position, world_context};
use crate::pool::DecisionPool;

/// Whether the game is still being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaStatus {
    /// Two or more agents are still active.
    Running,
    /// Fewer than two agents remain.
    GameOver {
        /// The last agent standing, if exactly one remains.
        winner: Option<AgentId>,
    },
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number; unchanged by ticks after game over.
    pub tick: u64,
    /// Decisions applied this tick, in roster order.
    pub decisions: Vec<(AgentId, Decision)>,
    /// Agents eliminated this tick.
    pub eliminated: Vec<AgentId>,
    /// Active agents after the tick.
    pub active: usize,
    /// Whether the game is over after the tick.
    pub game_over: bool,
}

/// Owns the roster and runs ticks.
pub struct Arena {
    agents: Vec<Agent>,
    bounds: Bounds,
    proximity: i32,
    pool: DecisionPool,
    prompts: PromptEngine,
    tick: u64,
    status: ArenaStatus,
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("agents", &self.agents)
            .field("bounds", &self.bounds)
            .field("proximity", &self.proximity)
            .field("tick", &self.tick)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Arena {
    /// Build an arena for `agents`.
    ///
    /// Starting positions are clamped into bounds. A roster with fewer than
    /// two active agents starts out finished.
    pub fn new(
        config: &ArenaConfig,
        mut agents: Vec<Agent>,
        pool: DecisionPool,
        prompts: PromptEngine,
    ) -> Self {
        let bounds = config.bounds(agents.len());
        for agent in &mut agents {
            agent.set_position(bounds.clamp(agent.position()));
        }

        let mut arena = Self {
            agents,
            bounds,
            proximity: config.proximity,
            pool,
            prompts,
            tick: 0,
            status: ArenaStatus::Running,
        };
        arena.update_status();
        arena
    }

    /// Run one tick against the wall clock.
    pub fn tick(&mut self) -> TickReport {
        self.tick_at(Instant::now())
    }

    /// Run one tick as if the current time were `now`.
    pub fn tick_at(&mut self, now: Instant) -> TickReport {
        if self.is_game_over() {
            return self.report(Vec::new(), Vec::new());
        }
        self.tick = self.tick.saturating_add(1);

        let worlds: Vec<String> = (0..self.agents.len())
            .map(|index| self.render_world(index))
            .collect();

        let ctx = DecisionContext {
            pool: &self.pool,
            prompts: &self.prompts,
        };
        let mut decisions = Vec::new();
        for (agent, world) in self.agents.iter_mut().zip(&worlds) {
            if let Some(decision) = agent.maybe_decide(world, &ctx, now) {
                decisions.push((agent.id(), decision));
            }
        }

        for agent in &mut self.agents {
            agent.set_position(self.bounds.clamp(agent.position()));
        }

        let eliminated = self.resolve_encounters();
        self.update_status();
        self.report(decisions, eliminated)
    }

    fn render_world(&self, index: usize) -> String {
        let Some(world) = world_context(&self.agents, index, self.proximity) else {
            return String::new();
        };
        match self.prompts.render_world(&world) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "World context render failed, sending empty context");
                String::new()
            }
        }
    }

    /// Settle speech and eliminations between agents at the same spot.
    fn resolve_encounters(&mut self) -> Vec<AgentId> {
        for agent in &mut self.agents {
            agent.clear_overheard();
        }

        let snapshot: Vec<Encounter> = self.agents.iter().map(Encounter::of).collect();
        let mut heard: Vec<(usize, String)> = Vec::new();
        let mut doomed: Vec<usize> = Vec::new();

        for (i, a) in snapshot.iter().enumerate() {
            for (j, b) in snapshot.iter().enumerate().skip(i.saturating_add(1)) {
                if !a.active || !b.active || !is_same_position(a.position, b.position, self.proximity)
                {
                    continue;
                }
                if let Some(speech) = &a.speech {
                    heard.push((j, speech.clone()));
                }
                if let Some(speech) = &b.speech {
                    heard.push((i, speech.clone()));
                }
                if b.emotion == Some(a.goal) {
                    doomed.push(j);
                }
                if a.emotion == Some(b.goal) {
                    doomed.push(i);
                }
            }
        }

        for (index, speech) in heard {
            if let Some(agent) = self.agents.get_mut(index) {
                agent.hear(&speech);
            }
        }

        let mut eliminated = Vec::new();
        for index in doomed {
            let Some(agent) = self.agents.get_mut(index) else {
                continue;
            };
            if agent.is_eliminated() {
                continue;
            }
            agent.eliminate();
            info!(tick = self.tick, agent = %agent.name(), "Agent eliminated");
            eliminated.push(agent.id());
        }
        eliminated
    }

    fn update_status(&mut self) {
        if self.is_game_over() || self.active_count() >= 2 {
            return;
        }
        let winner = self.agents.iter().find(|a| !a.is_eliminated());
        info!(tick = self.tick, winner = winner.map(Agent::name), "Game over");
        self.status = ArenaStatus::GameOver {
            winner: winner.map(Agent::id),
        };
    }

    fn report(&self, decisions: Vec<(AgentId, Decision)>, eliminated: Vec<AgentId>) -> TickReport {
        TickReport {
            tick: self.tick,
            decisions,
            eliminated,
            active: self.active_count(),
            game_over: self.is_game_over(),
        }
    }

    /// Replace an agent's personality. Returns `false` for unknown ids.
    pub fn edit_personality(&mut self, id: AgentId, personality: impl Into<String>) -> bool {
        let Some(agent) = self.agents.iter_mut().find(|a| a.id() == id) else {
            return false;
        };
        agent.set_personality(personality);
        true
    }

    /// The roster, in order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Look up an agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    /// Agents not yet eliminated.
    pub fn active_count(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_eliminated()).count()
    }

    /// The walkable rectangle.
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Current status.
    pub const fn status(&self) -> ArenaStatus {
        self.status
    }

    /// Whether the game has ended.
    pub const fn is_game_over(&self) -> bool {
        matches!(self.status, ArenaStatus::GameOver { .. })
    }

    /// The last agent standing, once the game is over.
    pub fn winner(&self) -> Option<&Agent> {
        match self.status {
            ArenaStatus::GameOver { winner: Some(id) } => self.agent(id),
            _ => None,
        }
    }

    /// Ticks run so far.
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }
}

/// The parts of an agent that matter when two agents meet.
struct Encounter {
    position: Position,
    speech: Option<String>,
    emotion: Option<Emotion>,
    goal: Emotion,
    active: bool,
}

impl Encounter {
    fn of(agent: &Agent) -> Self {
        Self {
            position: agent.position(),
            speech: agent.last_speech().map(ToOwned::to_owned),
            emotion: agent.last_emotion(),
            goal: agent.goal(),
            active: !agent.is_eliminated(),
        }
    }
}
