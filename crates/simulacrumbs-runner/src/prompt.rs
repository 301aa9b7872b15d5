//! Prompt template loading and rendering via `minijinja`.
//!
//! Two templates drive every decision:
//!
//! - `world` renders a [`WorldContext`] into the plain-text situation report
//!   an agent reads each tick.
//! - `decision` wraps the agent's personality, that report and the JSON
//!   schema of [`Decision`] into the final prompt. It ends with an opening
//!   `{` so the model continues straight into the object body.
//!
//! Defaults are compiled in. Operators can override both files from a
//! directory without recompiling.
//!
//! [`Decision`]: simulacrumbs_types::Decision

use minijinja::{Environment, context};
use serde_json::json;
use simulacrumbs_types::{Action, Emotion, WorldContext};

use crate::error::RunnerError;

const DEFAULT_WORLD_TEMPLATE: &str = include_str!("../templates/world.j2");
const DEFAULT_DECISION_TEMPLATE: &str = include_str!("../templates/decision.j2");

/// Renders world contexts and decision prompts.
pub struct PromptEngine {
    env: Environment<'static>,
    schema: String,
}

impl PromptEngine {
    /// Create a prompt engine with the built-in templates.
    pub fn new() -> Result<Self, RunnerError> {
        Self::with_templates(
            DEFAULT_WORLD_TEMPLATE.to_owned(),
            DEFAULT_DECISION_TEMPLATE.to_owned(),
        )
    }

    /// Create a prompt engine loading `world.j2` and `decision.j2` from `dir`.
    pub fn from_dir(dir: &str) -> Result<Self, RunnerError> {
        let world = load_template(dir, "world.j2")?;
        let decision = load_template(dir, "decision.j2")?;
        Self::with_templates(world, decision)
    }

    fn with_templates(world: String, decision: String) -> Result<Self, RunnerError> {
        let mut env = Environment::new();
        env.add_template_owned("world", world)
            .map_err(|e| RunnerError::Template(format!("failed to add world template: {e}")))?;
        env.add_template_owned("decision", decision).map_err(|e| {
            RunnerError::Template(format!("failed to add decision template: {e}"))
        })?;

        Ok(Self {
            env,
            schema: decision_schema(),
        })
    }

    /// Render an agent's situation report for this tick.
    pub fn render_world(&self, world: &WorldContext) -> Result<String, RunnerError> {
        self.env
            .get_template("world")
            .map_err(|e| RunnerError::Template(format!("missing world template: {e}")))?
            .render(world)
            .map_err(|e| RunnerError::Template(format!("world render failed: {e}")))
    }

    /// Render the full decision prompt sent to the model.
    pub fn render_decision(&self, personality: &str, world: &str) -> Result<String, RunnerError> {
        self.env
            .get_template("decision")
            .map_err(|e| RunnerError::Template(format!("missing decision template: {e}")))?
            .render(context! {
                personality => personality,
                world => world,
                schema => &self.schema,
            })
            .map_err(|e| RunnerError::Template(format!("decision render failed: {e}")))
    }

    /// The JSON schema embedded in every decision prompt.
    pub fn schema(&self) -> &str {
        &self.schema
    }
}

/// JSON schema describing a [`Decision`](simulacrumbs_types::Decision).
///
/// Enum values are listed explicitly so the model sees the closed sets.
pub fn decision_schema() -> String {
    let actions: Vec<&str> = Action::ALL.iter().map(|a| a.as_str()).collect();
    let emotions: Vec<&str> = Emotion::ALL.iter().map(|e| e.as_str()).collect();
    json!({
        "title": "Decision",
        "type": "object",
        "properties": {
            "action": {"type": "string", "enum": actions},
            "thought": {"type": "string"},
            "speak": {"type": "string"},
            "emotion": {"type": "string", "enum": emotions}
        },
        "required": ["action", "thought", "emotion"]
    })
    .to_string()
}

/// Read a template file from disk.
fn load_template(dir: &str, filename: &str) -> Result<String, RunnerError> {
    let path = format!("{dir}/{filename}");
    std::fs::read_to_string(&path)
        .map_err(|e| RunnerError::Template(format!("failed to read {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use simulacrumbs_types::{Decision, RelativePosition};

    use super::*;

    fn engine() -> Option<PromptEngine> {
        let engine = PromptEngine::new();
        assert!(engine.is_ok(), "built-in templates should compile");
        engine.ok()
    }

    #[test]
    fn world_report_lists_directions_and_history() {
        let Some(engine) = engine() else { return };
        let last = Decision {
            action: Action::Left,
            thought: "find the ballerina".to_owned(),
            speak: String::new(),
            emotion: Emotion::Angry,
        };
        let ctx = WorldContext::new(
            vec![RelativePosition::Right, RelativePosition::Same],
            Some(&last),
            Some("you look tired"),
        );

        let text = engine.render_world(&ctx).unwrap_or_default();
        assert!(text.contains("There are 2 other agents in the room."));
        assert!(text.contains("The other agents are right, same position from you."));
        assert!(text.contains("Your most recent action was left."));
        assert!(text.contains("\"find the ballerina\""));
        assert!(text.contains("Your most recent emotion was angry."));
        assert!(text.contains("The other agent said 'you look tired'"));
    }

    #[test]
    fn world_report_omits_overheard_line_when_silent() {
        let Some(engine) = engine() else { return };
        let ctx = WorldContext::new(vec![RelativePosition::Up], None, None);
        let text = engine.render_world(&ctx).unwrap_or_default();
        assert!(text.contains("There is 1 other agent in the room."));
        assert!(!text.contains("The other agent said"));
        assert!(!text.contains("none"));
    }

    #[test]
    fn decision_prompt_embeds_personality_world_and_schema() {
        let Some(engine) = engine() else { return };
        let prompt = engine
            .render_decision("You are a warrior", "The room is empty.")
            .unwrap_or_default();

        assert!(prompt.starts_with("You are a warrior"));
        assert!(prompt.contains("The room is empty."));
        assert!(prompt.contains(engine.schema()));
        assert!(prompt.trim_end().ends_with('{'));
    }

    #[test]
    fn schema_lists_closed_sets() {
        let schema: serde_json::Value =
            serde_json::from_str(&decision_schema()).unwrap_or_default();
        let actions = schema
            .pointer("/properties/action/enum")
            .and_then(serde_json::Value::as_array);
        assert_eq!(actions.map(Vec::len), Some(6));
        assert!(actions.is_some_and(|a| a.contains(&json!("talk"))));
        assert_eq!(
            schema.get("required"),
            Some(&json!(["action", "thought", "emotion"]))
        );
    }

    #[test]
    fn templates_load_from_directory() {
        let unique = format!(
            "simulacrumbs_test_templates_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("world.j2"), "{{ other_agents }} others").ok();
        std::fs::write(dir.join("decision.j2"), "{{ personality }}|{{ world }}").ok();

        let engine = PromptEngine::from_dir(dir.to_str().unwrap_or(""));
        assert!(engine.is_ok(), "templates should load from disk");
        if let Ok(engine) = engine {
            let ctx = WorldContext::new(vec![RelativePosition::Left; 3], None, None);
            assert_eq!(engine.render_world(&ctx).unwrap_or_default(), "3 others");
            assert_eq!(
                engine.render_decision("p", "w").unwrap_or_default(),
                "p|w"
            );
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_template_returns_error() {
        let unique = format!(
            "simulacrumbs_missing_templates_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("world.j2"), "only world").ok();

        let result = PromptEngine::from_dir(dir.to_str().unwrap_or(""));
        assert!(result.is_err(), "should fail when decision.j2 is missing");

        std::fs::remove_dir_all(&dir).ok();
    }
}
