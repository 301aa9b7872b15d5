//! Decoding model responses into [`Decision`] values.
//!
//! The model was asked for a JSON object matching the decision schema, but
//! nothing guarantees it complied. The prompt ends with an opening `{` and
//! the request stops on `}`, so a well-behaved reply is the object body with
//! neither brace. Anything else gets a few recovery attempts:
//!
//! 1. Frame the trimmed text with the missing braces and parse it.
//! 2. Extract JSON from a markdown code block.
//! 3. Strip trailing commas and retry.
//!
//! [`decode`] never fails: when every attempt is exhausted, or the JSON does
//! not fit the closed action and emotion sets, it returns
//! [`Decision::fallback`]. [`try_decode`] exposes the tagged reason.

use std::collections::BTreeMap;

use serde_json::Value;
use simulacrumbs_types::{Action, Decision, Emotion};
use tracing::warn;

use crate::error::RunnerError;

/// Decode raw model text, substituting the fallback decision on any failure.
pub fn decode(raw: &str) -> Decision {
    match try_decode(raw) {
        Ok(decision) => decision,
        Err(e) => {
            warn!(
                kind = e.kind(),
                error = %e,
                raw_response = raw,
                "undecodable model response, falling back to stay"
            );
            Decision::fallback()
        }
    }
}

/// Decode the outcome of a model call.
///
/// A failed call takes the same fallback path as an unparseable reply.
pub fn decode_completion(result: Result<String, RunnerError>) -> Decision {
    match result {
        Ok(raw) => decode(&raw),
        Err(e) => {
            warn!(
                kind = e.kind(),
                error = %e,
                "model call failed, falling back to stay"
            );
            Decision::fallback()
        }
    }
}

/// Decode raw model text, reporting why it was rejected.
pub fn try_decode(raw: &str) -> Result<Decision, RunnerError> {
    let trimmed = raw.trim();

    // Strategy 1: restore the braces stripped by the calling convention
    let framed = frame(trimmed);
    let first_error = match serde_json::from_str::<Value>(&framed) {
        Ok(value) => return convert(value),
        Err(e) => e,
    };

    // Strategy 2: markdown code block
    let fenced = extract_json_from_codeblock(trimmed).map(frame);
    if let Some(inner) = &fenced
        && let Ok(value) = serde_json::from_str::<Value>(inner)
    {
        return convert(value);
    }

    // Strategy 3: trailing commas, on the whole text and then the fenced block
    for candidate in std::iter::once(&framed).chain(fenced.as_ref()) {
        if let Ok(value) = serde_json::from_str::<Value>(&strip_trailing_commas(candidate)) {
            return convert(value);
        }
    }

    Err(RunnerError::Parse(format!(
        "no parse strategy succeeded ({first_error}) for: {trimmed}"
    )))
}

/// Validate a parsed JSON value against the decision schema.
fn convert(value: Value) -> Result<Decision, RunnerError> {
    let Value::Object(map) = value else {
        return Err(RunnerError::Validation(
            "response is not a JSON object".to_owned(),
        ));
    };
    let fields: BTreeMap<String, Value> = map
        .into_iter()
        .map(|(key, v)| (key.trim().to_lowercase(), v))
        .collect();

    let action_label = required_str(&fields, &["action"])?;
    let action = Action::from_label(action_label)
        .ok_or_else(|| RunnerError::Validation(format!("unknown action: {action_label}")))?;

    let thought = required_str(&fields, &["thought"])?.to_owned();

    let emotion_label = required_str(&fields, &["emotion", "your_emotion"])?;
    let emotion = Emotion::from_label(emotion_label)
        .ok_or_else(|| RunnerError::Validation(format!("unknown emotion: {emotion_label}")))?;

    let speak = match fields.get("speak") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(RunnerError::Validation(format!(
                "speak must be a string, got {other}"
            )));
        }
    };

    Ok(Decision {
        action,
        thought,
        speak,
        emotion,
    })
}

/// Look up the first present key among `names` and require a string.
fn required_str<'a>(
    fields: &'a BTreeMap<String, Value>,
    names: &[&str],
) -> Result<&'a str, RunnerError> {
    let (name, value) = names
        .iter()
        .find_map(|name| fields.get(*name).map(|v| (*name, v)))
        .ok_or_else(|| {
            RunnerError::Validation(format!("missing required field: {}", names.join(" / ")))
        })?;
    value
        .as_str()
        .ok_or_else(|| RunnerError::Validation(format!("{name} must be a string")))
}

/// Add the opening and closing braces the calling convention strips.
fn frame(text: &str) -> String {
    let body = text.trim();
    let mut framed = String::with_capacity(body.len().saturating_add(2));
    if !body.starts_with('{') {
        framed.push('{');
    }
    framed.push_str(body);
    if !body.ends_with('}') {
        framed.push('}');
    }
    framed
}

/// Extract the contents of the first markdown code block, if any.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = text.get(open.checked_add(3)?..)?;
    // Skip the info string (`json`, `JSON`, ...) up to the end of the line.
    let body_start = after_fence.find('\n').and_then(|nl| nl.checked_add(1))?;
    let body = after_fence.get(body_start..)?;
    let close = body.find("```")?;
    body.get(..close).map(str::trim)
}

/// Drop commas that directly precede a closing brace or bracket.
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == ',' {
            let rest = chars.clone().find(|n| !n.is_whitespace());
            if matches!(rest, Some('}' | ']')) {
                continue;
            }
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_brace_stripped_completion() {
        let raw = r#" "action": "left", "thought": "I should find the ballerina", "speak": "", "emotion": "angry" "#;
        let decision = decode(raw);
        assert_eq!(decision.action, Action::Left);
        assert_eq!(decision.thought, "I should find the ballerina");
        assert_eq!(decision.emotion, Emotion::Angry);
        assert!(decision.speak.is_empty());
    }

    #[test]
    fn parses_full_object() {
        let raw = r#"{"action": "talk", "thought": "cheer her up", "speak": "You dance beautifully!", "emotion": "happy"}"#;
        let decision = try_decode(raw);
        assert!(decision.is_ok());
        let Ok(decision) = decision else { return };
        assert_eq!(decision.action, Action::Talk);
        assert_eq!(decision.speak, "You dance beautifully!");
        assert_eq!(decision.emotion, Emotion::Happy);
    }

    #[test]
    fn roundtrips_schema_conforming_decision() {
        let original = Decision {
            action: Action::Down,
            thought: "Keep my distance".to_owned(),
            speak: "Stay back!".to_owned(),
            emotion: Emotion::Sad,
        };
        let json = serde_json::to_string(&original).unwrap_or_default();
        assert_eq!(decode(&json), original);
    }

    #[test]
    fn normalizes_mixed_case_keys_and_values() {
        let raw = r#"{"Action": "MOVE_UP", "THOUGHT": "Onward", "Emotion": "Neutral"}"#;
        let decision = decode(raw);
        assert_eq!(decision.action, Action::Up);
        assert_eq!(decision.thought, "Onward");
        assert_eq!(decision.emotion, Emotion::Neutral);
    }

    #[test]
    fn accepts_legacy_emotion_key() {
        let raw = r#""action": "stay", "thought": "hm", "your_emotion": "sad""#;
        assert_eq!(decode(raw).emotion, Emotion::Sad);
    }

    #[test]
    fn speak_defaults_to_empty() {
        let raw = r#""action": "right", "thought": "go", "emotion": "happy""#;
        assert!(decode(raw).speak.is_empty());
        let raw_null = r#""action": "right", "thought": "go", "speak": null, "emotion": "happy""#;
        assert!(decode(raw_null).speak.is_empty());
    }

    #[test]
    fn garbage_returns_fallback() {
        let decision = decode("I think I should walk over and say hello.");
        assert!(decision.is_fallback());
        assert!(matches!(
            try_decode("I think I should walk over."),
            Err(RunnerError::Parse(_))
        ));
    }

    #[test]
    fn empty_returns_fallback() {
        assert!(decode("").is_fallback());
        assert!(decode("   \n").is_fallback());
        assert!(matches!(try_decode(""), Err(RunnerError::Validation(_))));
    }

    #[test]
    fn unknown_action_returns_fallback() {
        let raw = r#""action": "dance", "thought": "twirl", "emotion": "happy""#;
        assert!(decode(raw).is_fallback());
        assert!(matches!(try_decode(raw), Err(RunnerError::Validation(_))));
    }

    #[test]
    fn unknown_emotion_returns_fallback() {
        let raw = r#""action": "left", "thought": "go", "emotion": "ecstatic""#;
        assert!(decode(raw).is_fallback());
    }

    #[test]
    fn missing_required_field_returns_fallback() {
        assert!(decode(r#""action": "left", "emotion": "happy""#).is_fallback());
        assert!(decode(r#""thought": "go", "emotion": "happy""#).is_fallback());
        assert!(decode(r#""action": "left", "thought": "go""#).is_fallback());
    }

    #[test]
    fn wrong_field_types_return_fallback() {
        assert!(decode(r#""action": 3, "thought": "go", "emotion": "happy""#).is_fallback());
        assert!(decode(r#""action": "left", "thought": "go", "speak": 5, "emotion": "happy""#).is_fallback());
        assert!(decode("[1, 2, 3]").is_fallback());
    }

    #[test]
    fn model_error_returns_fallback() {
        let decision = decode_completion(Err(RunnerError::LlmBackend("timeout".to_owned())));
        assert!(decision.is_fallback());
        let ok = decode_completion(Ok(r#""action": "up", "thought": "x", "emotion": "sad""#.to_owned()));
        assert_eq!(ok.action, Action::Up);
    }

    #[test]
    fn parses_from_codeblock() {
        let raw = "Here is my move:\n\n```json\n{\"action\": \"down\", \"thought\": \"retreat\", \"emotion\": \"sad\"}\n```\nDone.";
        let decision = decode(raw);
        assert_eq!(decision.action, Action::Down);
        assert_eq!(decision.thought, "retreat");
    }

    #[test]
    fn parses_trailing_comma() {
        let raw = r#""action": "stay", "thought": "wait", "emotion": "neutral","#;
        let decision = try_decode(raw);
        assert!(decision.is_ok_and(|d| d.action == Action::Stay && d.thought == "wait"));
    }

    #[test]
    fn frame_adds_only_missing_braces() {
        assert_eq!(frame("\"a\": 1"), "{\"a\": 1}");
        assert_eq!(frame("{\"a\": 1"), "{\"a\": 1}");
        assert_eq!(frame("\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(frame("{}"), "{}");
        assert_eq!(frame(""), "{}");
    }

    #[test]
    fn extract_json_from_markdown() {
        let text = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_from_codeblock(text), Some("{\"key\": \"value\"}"));
        let plain = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_from_codeblock(plain), Some("{\"key\": \"value\"}"));
        assert_eq!(extract_json_from_codeblock("no fences here"), None);
    }

    #[test]
    fn strip_trailing_commas_basic() {
        assert_eq!(strip_trailing_commas(r#"{"a": 1, "b": 2,}"#), r#"{"a": 1, "b": 2}"#);
        assert_eq!(strip_trailing_commas("[1, 2, 3,\n]"), "[1, 2, 3\n]");
        assert_eq!(strip_trailing_commas(r#"{"a": "x, y"}"#), r#"{"a": "x, y"}"#);
    }
}
