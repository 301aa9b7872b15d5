//! Shared type definitions for the Simulacrumbs arena.
//!
//! Every crate in the workspace speaks in these types: the decoder produces
//! [`Decision`] values, the core crate moves agents by [`Position`] inside
//! [`Bounds`], and the prompt engine renders a [`WorldContext`].
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for agent identifiers
//! - [`enums`] -- Closed enumerations (actions, emotions, directions, appearance)
//! - [`structs`] -- Decisions and arena geometry
//! - [`perception`] -- Per-agent world context handed to the prompt engine

pub mod enums;
pub mod ids;
pub mod perception;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Action, Appearance, Emotion, RelativePosition};
pub use ids::AgentId;
pub use perception::WorldContext;
pub use structs::{Bounds, Decision, Position};
