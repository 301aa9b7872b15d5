//! The world context an agent sees each tick.
//!
//! The coordinator builds one [`WorldContext`] per agent per tick; the prompt
//! engine renders it into the text block embedded in the agent's prompt. If
//! something is not in here, the agent does not know about it.

use serde::{Deserialize, Serialize};

use crate::enums::RelativePosition;
use crate::structs::Decision;

/// Everything an agent perceives about the arena on one tick.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorldContext {
    /// Number of other agents in the arena.
    pub other_agents: usize,
    /// Direction of each other agent, in roster order.
    pub directions: Vec<RelativePosition>,
    /// The agent's most recent action, or empty before its first decision.
    pub last_action: String,
    /// The agent's most recent thought, or empty.
    pub last_thought: String,
    /// The agent's most recent emotion, or empty.
    pub last_emotion: String,
    /// Speech overheard from a nearby agent on the previous tick, or empty.
    pub overheard: String,
}

impl WorldContext {
    /// Build a context from the agent's own last decision and what it can
    /// see of the others.
    pub fn new(
        directions: Vec<RelativePosition>,
        last: Option<&Decision>,
        overheard: Option<&str>,
    ) -> Self {
        Self {
            other_agents: directions.len(),
            directions,
            last_action: last.map(|d| d.action.to_string()).unwrap_or_default(),
            last_thought: last.map(|d| d.thought.clone()).unwrap_or_default(),
            last_emotion: last.map(|d| d.emotion.to_string()).unwrap_or_default(),
            overheard: overheard.map(ToOwned::to_owned).unwrap_or_default(),
        }
    }
}
