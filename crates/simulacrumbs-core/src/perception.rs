//! Perception: what each agent can tell about the others.
//!
//! Agents do not see coordinates. They see a coarse direction per other
//! agent, computed against the proximity threshold, plus their own last
//! decision and anything overheard on the previous tick.

use simulacrumbs_types::{Position, RelativePosition, WorldContext};

use crate::agent::Agent;

/// Direction from `observer` to `other`.
///
/// The x-axis wins: a horizontal gap larger than `threshold` is reported as
/// left or right even if the vertical gap is larger still. Within the
/// threshold on both axes the two share a position.
pub fn relative_position(observer: Position, other: Position, threshold: i32) -> RelativePosition {
    let dx = i64::from(other.x).saturating_sub(i64::from(observer.x));
    let dy = i64::from(other.y).saturating_sub(i64::from(observer.y));
    let threshold = i64::from(threshold);

    if dx.abs() > threshold {
        if dx > 0 {
            RelativePosition::Right
        } else {
            RelativePosition::Left
        }
    } else if dy.abs() > threshold {
        if dy > 0 {
            RelativePosition::Up
        } else {
            RelativePosition::Down
        }
    } else {
        RelativePosition::Same
    }
}

/// Whether two positions count as the same spot.
pub fn is_same_position(a: Position, b: Position, threshold: i32) -> bool {
    relative_position(a, b, threshold) == RelativePosition::Same
}

/// Build the [`WorldContext`] for the agent at `index` in `agents`.
///
/// Directions are listed in roster order, skipping the agent itself.
/// Eliminated agents stay visible; they are still standing in the arena.
pub fn world_context(agents: &[Agent], index: usize, threshold: i32) -> Option<WorldContext> {
    let me = agents.get(index)?;
    let directions = agents
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, other)| relative_position(me.position(), other.position(), threshold))
        .collect();

    Some(WorldContext::new(
        directions,
        me.last_decision(),
        me.overheard(),
    ))
}
