//! Agent state and the per-agent decision state machine.
//!
//! Each agent owns exactly one decision slot. Per tick the slot moves at
//! most one step:
//!
//! ```text
//! Idle --submit--> InFlight --reply--> Completed --apply--> Idle
//! ```
//!
//! The slot never holds more than one request, so a slow model cannot pile
//! up decisions. Whatever comes back, success or failure, is decoded into a
//! [`Decision`] and applied; failures become the fallback decision and are
//! not retried.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use simulacrumbs_runner::{CompletionSource, PromptEngine, RunnerError, decode_completion};
use simulacrumbs_types::{AgentId, Appearance, Decision, Emotion, Position};
use tracing::{debug, warn};

use crate::pool::{DecisionPool, PendingDecision};

/// Pixels moved per action unless overridden.
pub const DEFAULT_STEP: i32 = 10;

/// Minimum time between completed decisions unless overridden.
pub const DEFAULT_MOVE_DELAY: Duration = Duration::from_secs(5);

/// Shared services an agent needs to start a decision.
#[derive(Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Worker pool that runs the model call.
    pub pool: &'a DecisionPool,
    /// Prompt templates.
    pub prompts: &'a PromptEngine,
}

/// Observable state of an agent's decision slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No request outstanding.
    Idle,
    /// A request is running on the pool.
    InFlight,
    /// A result is waiting to be applied on the next tick.
    Completed,
}

enum DecisionSlot {
    Idle,
    InFlight(PendingDecision),
    Completed(Result<String, RunnerError>),
}

impl DecisionSlot {
    const fn state(&self) -> SlotState {
        match self {
            Self::Idle => SlotState::Idle,
            Self::InFlight(_) => SlotState::InFlight,
            Self::Completed(_) => SlotState::Completed,
        }
    }
}

/// One participant in the arena.
pub struct Agent {
    id: AgentId,
    name: String,
    position: Position,
    personality: String,
    goal: Emotion,
    history: Vec<Decision>,
    step: i32,
    move_delay: Duration,
    last_decided_at: Option<Instant>,
    slot: DecisionSlot,
    eliminated: bool,
    appearance: Appearance,
    overheard: Option<String>,
    source: Arc<dyn CompletionSource>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("goal", &self.goal)
            .field("history_len", &self.history.len())
            .field("slot", &self.slot.state())
            .field("eliminated", &self.eliminated)
            .field("source", &self.source.name())
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create an agent at the origin with default step and cadence.
    pub fn new(
        name: impl Into<String>,
        personality: impl Into<String>,
        goal: Emotion,
        source: Arc<dyn CompletionSource>,
    ) -> Self {
        Self {
            id: AgentId::new(),
            name: name.into(),
            position: Position::default(),
            personality: personality.into(),
            goal,
            history: Vec::new(),
            step: DEFAULT_STEP,
            move_delay: DEFAULT_MOVE_DELAY,
            last_decided_at: None,
            slot: DecisionSlot::Idle,
            eliminated: false,
            appearance: Appearance::Idle,
            overheard: None,
            source,
        }
    }

    /// Set the starting position.
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the pixels moved per action.
    #[must_use]
    pub const fn with_step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    /// Set the minimum time between completed decisions.
    #[must_use]
    pub const fn with_move_delay(mut self, delay: Duration) -> Self {
        self.move_delay = delay;
        self
    }

    /// Advance the decision slot by one step.
    ///
    /// `world` is this tick's rendered situation report. Returns the decision
    /// applied on this call, if any. Never blocks on the model.
    pub fn maybe_decide(
        &mut self,
        world: &str,
        ctx: &DecisionContext<'_>,
        now: Instant,
    ) -> Option<Decision> {
        if self.eliminated {
            return None;
        }
        if let Some(last) = self.last_decided_at
            && now.saturating_duration_since(last) < self.move_delay
        {
            return None;
        }

        match std::mem::replace(&mut self.slot, DecisionSlot::Idle) {
            DecisionSlot::Idle => {
                self.slot = self.start_request(world, ctx);
                None
            }
            DecisionSlot::InFlight(mut pending) => match pending.try_take() {
                Some(result) => Some(self.complete(result, now)),
                None => {
                    self.slot = DecisionSlot::InFlight(pending);
                    None
                }
            },
            DecisionSlot::Completed(result) => Some(self.complete(result, now)),
        }
    }

    fn start_request(&self, world: &str, ctx: &DecisionContext<'_>) -> DecisionSlot {
        match ctx.prompts.render_decision(&self.personality, world) {
            Ok(prompt) => {
                debug!(agent = %self.name, source = self.source.name(), "Requesting decision");
                DecisionSlot::InFlight(ctx.pool.submit(Arc::clone(&self.source), prompt))
            }
            Err(e) => {
                warn!(agent = %self.name, error = %e, "Could not render decision prompt");
                DecisionSlot::Completed(Err(e))
            }
        }
    }

    fn complete(&mut self, result: Result<String, RunnerError>, now: Instant) -> Decision {
        let decision = decode_completion(result);
        debug!(
            agent = %self.name,
            action = %decision.action,
            emotion = %decision.emotion,
            fallback = decision.is_fallback(),
            "Decision completed"
        );
        self.apply(decision.clone());
        self.last_decided_at = Some(now);
        decision
    }

    /// Apply a decision: move, update appearance, record it.
    ///
    /// Eliminated agents ignore decisions entirely. Position is not clamped
    /// here; the arena does that after every agent has moved.
    pub fn apply(&mut self, decision: Decision) {
        if self.eliminated {
            return;
        }
        let (dx, dy) = decision.action.offset();
        self.position = self
            .position
            .translate(dx.saturating_mul(self.step), dy.saturating_mul(self.step));
        self.appearance = Appearance::for_action(decision.action);
        self.history.push(decision);
    }

    /// Stable identifier.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current personality text.
    pub fn personality(&self) -> &str {
        &self.personality
    }

    /// Replace the personality used for future prompts.
    pub fn set_personality(&mut self, personality: impl Into<String>) {
        self.personality = personality.into();
    }

    /// The emotion this agent tries to provoke in others.
    pub const fn goal(&self) -> Emotion {
        self.goal
    }

    /// Every decision applied so far, oldest first.
    pub fn history(&self) -> &[Decision] {
        &self.history
    }

    /// The last `n` decisions, oldest first.
    pub fn recent_history(&self, n: usize) -> &[Decision] {
        let start = self.history.len().saturating_sub(n);
        self.history.get(start..).unwrap_or_default()
    }

    /// Most recent decision, if any.
    pub fn last_decision(&self) -> Option<&Decision> {
        self.history.last()
    }

    /// Most recent emotion, if the agent has decided at least once.
    pub fn last_emotion(&self) -> Option<Emotion> {
        self.history.last().map(|d| d.emotion)
    }

    /// What the agent said in its most recent decision, if anything.
    pub fn last_speech(&self) -> Option<&str> {
        self.history
            .last()
            .map(|d| d.speak.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Whether the agent is out of the game.
    pub const fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    /// Cosmetic sprite state.
    pub const fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// Speech overheard on the previous tick.
    pub fn overheard(&self) -> Option<&str> {
        self.overheard.as_deref()
    }

    /// Current state of the decision slot.
    pub const fn slot_state(&self) -> SlotState {
        self.slot.state()
    }

    /// Name of the completion source driving this agent.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub(crate) const fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) const fn eliminate(&mut self) {
        self.eliminated = true;
        self.appearance = Appearance::Eliminated;
    }

    pub(crate) fn hear(&mut self, speech: &str) {
        let heard = self.overheard.get_or_insert_with(String::new);
        if !heard.is_empty() {
            heard.push('\n');
        }
        heard.push_str(speech);
    }

    pub(crate) fn clear_overheard(&mut self) {
        self.overheard = None;
    }
}
