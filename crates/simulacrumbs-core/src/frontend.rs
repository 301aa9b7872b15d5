//! The render/input seam.
//!
//! A frontend sees the arena twice per tick: before the tick it may hand
//! back a new personality for any agent, and after the tick it receives the
//! updated state to draw. Windowing is out of scope here; the
//! [`HeadlessFrontend`] writes the same information to the log.

use std::collections::HashMap;
use std::fmt::Write as _;

use simulacrumbs_types::AgentId;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::arena::{Arena, TickReport};

/// Decisions shown in each agent's history panel.
pub const HISTORY_PANEL_LEN: usize = 5;

/// Something that displays the arena and lets a user steer agents.
pub trait Frontend {
    /// A replacement personality for `agent`, if the user edited it.
    ///
    /// Called once per agent before each tick.
    fn personality_edit(&mut self, agent: &Agent) -> Option<String>;

    /// Show the arena after a tick.
    fn render(&mut self, arena: &Arena, report: &TickReport);
}

/// Text of an agent's history panel: a header and its last `n` decisions.
pub fn history_panel(agent: &Agent, n: usize) -> String {
    let mut panel = format!("These are {}'s last {n} actions:", agent.name());
    for decision in agent.recent_history(n) {
        // Writing into a String cannot fail.
        let _ = write!(
            panel,
            "\n{} | {} | {}",
            decision.action, decision.emotion, decision.thought
        );
        if !decision.speak.is_empty() {
            let _ = write!(panel, " | says \"{}\"", decision.speak);
        }
    }
    panel
}

/// Logs arena state through `tracing`. Optionally replays scripted
/// personality edits, keyed by agent id, on the next tick.
#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    edits: HashMap<AgentId, String>,
}

impl HeadlessFrontend {
    /// A frontend with no pending edits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a personality edit to be picked up before the next tick.
    pub fn queue_edit(&mut self, id: AgentId, personality: impl Into<String>) {
        self.edits.insert(id, personality.into());
    }
}

impl Frontend for HeadlessFrontend {
    fn personality_edit(&mut self, agent: &Agent) -> Option<String> {
        self.edits.remove(&agent.id())
    }

    fn render(&mut self, arena: &Arena, report: &TickReport) {
        if report.decisions.is_empty() && report.eliminated.is_empty() {
            return;
        }
        info!(
            tick = report.tick,
            decisions = report.decisions.len(),
            eliminated = report.eliminated.len(),
            active = report.active,
            "Tick complete"
        );
        for agent in arena.agents() {
            debug!(
                agent = %agent.name(),
                source = agent.source_name(),
                position = %agent.position(),
                appearance = ?agent.appearance(),
                overheard = agent.overheard().unwrap_or_default(),
                "{}",
                history_panel(agent, HISTORY_PANEL_LEN)
            );
        }
    }
}
