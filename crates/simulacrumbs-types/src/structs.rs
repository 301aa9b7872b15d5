//! Decisions and arena geometry.

use serde::{Deserialize, Serialize};

use crate::enums::{Action, Emotion};

/// Thought recorded on the fallback decision.
pub const FALLBACK_THOUGHT: &str = "I don't know what to do";

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// The structured result of one agent decision cycle.
///
/// Decisions are created once by the decoder and then only ever appended to
/// an agent's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// What the agent does.
    pub action: Action,
    /// The agent's private reasoning.
    pub thought: String,
    /// What the agent says out loud; empty when silent.
    #[serde(default)]
    pub speak: String,
    /// How the agent feels after deciding.
    pub emotion: Emotion,
}

impl Decision {
    /// The safe default used whenever a model response cannot be trusted.
    pub fn fallback() -> Self {
        Self {
            action: Action::Stay,
            thought: FALLBACK_THOUGHT.to_owned(),
            speak: String::new(),
            emotion: Emotion::Neutral,
        }
    }

    /// Whether this decision is the fixed fallback.
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point in arena pixel space. `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move by `(dx, dy)`, saturating at the `i32` range.
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangle agents must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub min_x: i32,
    /// Right edge.
    pub max_x: i32,
    /// Bottom edge.
    pub min_y: i32,
    /// Top edge.
    pub max_y: i32,
}

impl Bounds {
    /// Build bounds from two corners, swapping edges given in the wrong order.
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    /// Whether `pos` lies inside the rectangle (edges included).
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }

    /// Snap `pos` to the nearest edge on any axis where it is out of range.
    #[must_use]
    pub fn clamp(&self, pos: Position) -> Position {
        Position {
            x: pos.x.max(self.min_x).min(self.max_x),
            y: pos.y.max(self.min_y).min(self.max_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_shape_is_fixed() {
        let fallback = Decision::fallback();
        assert_eq!(fallback.action, Action::Stay);
        assert_eq!(fallback.thought, "I don't know what to do");
        assert_eq!(fallback.emotion, Emotion::Neutral);
        assert!(fallback.speak.is_empty());
        assert!(fallback.is_fallback());
    }

    #[test]
    fn speak_defaults_to_empty() {
        let json = r#"{"action": "left", "thought": "go", "emotion": "happy"}"#;
        let decision: Result<Decision, _> = serde_json::from_str(json);
        assert!(decision.is_ok_and(|d| d.speak.is_empty()));
    }

    #[test]
    fn translate_saturates() {
        let pos = Position::new(i32::MAX, i32::MIN).translate(10, -10);
        assert_eq!(pos, Position::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn clamp_snaps_to_nearest_edge() {
        let bounds = Bounds::new(400, 1600, 0, 800);
        assert_eq!(bounds.clamp(Position::new(390, 900)), Position::new(400, 800));
        assert_eq!(bounds.clamp(Position::new(1700, -5)), Position::new(1600, 0));
        assert_eq!(bounds.clamp(Position::new(500, 500)), Position::new(500, 500));
        assert!(bounds.contains(bounds.clamp(Position::new(-1000, 9000))));
    }

    #[test]
    fn bounds_normalize_swapped_edges() {
        let bounds = Bounds::new(100, 0, 50, 10);
        assert_eq!(bounds.min_x, 0);
        assert_eq!(bounds.max_x, 100);
        assert_eq!(bounds.min_y, 10);
        assert_eq!(bounds.max_y, 50);
    }
}
