//! Enumeration types for the Simulacrumbs arena.
//!
//! [`Action`] and [`Emotion`] are closed sets: the decoder rejects anything
//! outside them and falls back to a safe default. Labels are matched
//! case-insensitively because language models are sloppy about casing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// An action an agent can take in one decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Step toward the left edge of the arena.
    Left,
    /// Step toward the right edge of the arena.
    Right,
    /// Step toward the top edge of the arena.
    Up,
    /// Step toward the bottom edge of the arena.
    Down,
    /// Do nothing this cycle.
    Stay,
    /// Stay in place and speak.
    Talk,
}

impl Action {
    /// Every action, in schema order.
    pub const ALL: [Self; 6] = [
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::Stay,
        Self::Talk,
    ];

    /// The canonical lowercase label used in prompts and JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Stay => "stay",
            Self::Talk => "talk",
        }
    }

    /// Unit offset applied to an agent's position, as `(dx, dy)`.
    ///
    /// The y-axis grows upward, so `Up` is `+1`.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Stay | Self::Talk => (0, 0),
        }
    }

    /// Parse a model-supplied label, ignoring case, separators and a
    /// leading `move` (`"Move_Left"`, `"move-left"` and `"LEFT"` all work).
    pub fn from_label(label: &str) -> Option<Self> {
        let folded: String = label
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        let bare = folded.strip_prefix("move").unwrap_or(&folded);
        match bare {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "stay" => Some(Self::Stay),
            "talk" | "speak" => Some(Self::Talk),
            _ => None,
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Emotion
// ---------------------------------------------------------------------------

/// The emotional state an agent reports with each decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Pleased or content.
    Happy,
    /// Downcast.
    Sad,
    /// Irritated or hostile.
    Angry,
    /// No strong feeling either way.
    Neutral,
}

impl Emotion {
    /// Every emotion, in schema order.
    pub const ALL: [Self; 4] = [Self::Happy, Self::Sad, Self::Angry, Self::Neutral];

    /// The canonical lowercase label used in prompts and JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
        }
    }

    /// Parse a model-supplied label, ignoring case and surrounding space.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "happy" => Some(Self::Happy),
            "sad" => Some(Self::Sad),
            "angry" => Some(Self::Angry),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl core::fmt::Display for Emotion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Relative position
// ---------------------------------------------------------------------------

/// Where another agent is, as seen from the observing agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativePosition {
    /// The other agent is further left than the proximity threshold.
    Left,
    /// The other agent is further right than the proximity threshold.
    Right,
    /// The other agent is higher up than the proximity threshold.
    Up,
    /// The other agent is further down than the proximity threshold.
    Down,
    /// Within the proximity threshold on both axes.
    #[serde(rename = "same position")]
    Same,
}

impl RelativePosition {
    /// The label the agent sees in its world context.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Same => "same position",
        }
    }
}

impl core::fmt::Display for RelativePosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Appearance
// ---------------------------------------------------------------------------

/// Cosmetic sprite state. Only the frontend reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appearance {
    /// Standing still.
    #[default]
    Idle,
    /// Walking left.
    WalkingLeft,
    /// Walking right.
    WalkingRight,
    /// Walking up.
    WalkingUp,
    /// Walking down.
    WalkingDown,
    /// Speaking.
    Talking,
    /// Out of the game.
    Eliminated,
}

impl Appearance {
    /// The sprite state that matches an action.
    pub const fn for_action(action: Action) -> Self {
        match action {
            Action::Left => Self::WalkingLeft,
            Action::Right => Self::WalkingRight,
            Action::Up => Self::WalkingUp,
            Action::Down => Self::WalkingDown,
            Action::Stay => Self::Idle,
            Action::Talk => Self::Talking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_lowercase() {
        let json = serde_json::to_string(&Action::Talk).ok();
        assert_eq!(json.as_deref(), Some("\"talk\""));
    }

    #[test]
    fn action_labels_are_case_insensitive() {
        assert_eq!(Action::from_label("LEFT"), Some(Action::Left));
        assert_eq!(Action::from_label("Move_Right"), Some(Action::Right));
        assert_eq!(Action::from_label("move-up"), Some(Action::Up));
        assert_eq!(Action::from_label("MoveDown"), Some(Action::Down));
        assert_eq!(Action::from_label("speak"), Some(Action::Talk));
        assert_eq!(Action::from_label("jump"), None);
        assert_eq!(Action::from_label(""), None);
    }

    #[test]
    fn offsets_cover_every_action() {
        assert_eq!(Action::Left.offset(), (-1, 0));
        assert_eq!(Action::Right.offset(), (1, 0));
        assert_eq!(Action::Up.offset(), (0, 1));
        assert_eq!(Action::Down.offset(), (0, -1));
        assert_eq!(Action::Stay.offset(), (0, 0));
        assert_eq!(Action::Talk.offset(), (0, 0));
    }

    #[test]
    fn emotion_labels() {
        assert_eq!(Emotion::from_label(" Happy "), Some(Emotion::Happy));
        assert_eq!(Emotion::from_label("SAD"), Some(Emotion::Sad));
        assert_eq!(Emotion::from_label("ecstatic"), None);
        assert_eq!(Emotion::Angry.to_string(), "angry");
    }

    #[test]
    fn same_position_serializes_with_space() {
        let json = serde_json::to_string(&RelativePosition::Same).ok();
        assert_eq!(json.as_deref(), Some("\"same position\""));
        assert_eq!(RelativePosition::Same.to_string(), "same position");
    }

    #[test]
    fn appearance_follows_action() {
        assert_eq!(Appearance::for_action(Action::Talk), Appearance::Talking);
        assert_eq!(Appearance::for_action(Action::Stay), Appearance::Idle);
        assert_eq!(Appearance::default(), Appearance::Idle);
    }
}
