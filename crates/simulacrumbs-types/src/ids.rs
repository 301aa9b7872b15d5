//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Agents are addressed by roster index inside the arena, but logs and the
//! frontend need an identity that survives reordering. IDs use UUID v7
//! (time-ordered) so agents created in sequence sort in creation order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an agent in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AgentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}
