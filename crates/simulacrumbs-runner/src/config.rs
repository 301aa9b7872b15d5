//! Configuration types for the model client.
//!
//! Backend settings come from environment variables so API keys never land
//! in the simulation YAML. Only the backend type, URL, key and model are
//! required; sampling parameters default to the values the arena was tuned
//! with (temperature 0.5, stop on `}`).

use crate::error::RunnerError;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default stop sequence. Prompts end with an opening `{` and the decoder
/// puts the closing brace back.
pub const DEFAULT_STOP: &str = "}";

/// Default completion length cap, in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// Environment variable naming a prompt template override directory.
pub const TEMPLATES_DIR_VAR: &str = "TEMPLATES_DIR";

/// Complete runner configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// The LLM backend every agent talks to.
    pub backend: LlmBackendConfig,
    /// Directory holding `decision.j2` and `world.j2` overrides, if any.
    pub templates_dir: Option<String>,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type (openai, anthropic).
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Sampling parameters sent with every request.
    pub params: CompletionParams,
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Sequences that end the completion early.
    pub stop: Vec<String>,
    /// Maximum completion length in tokens.
    pub max_tokens: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            stop: vec![DEFAULT_STOP.to_owned()],
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible API (works with `OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
}

impl BackendType {
    /// Parse a backend name as written in `LLM_BACKEND`.
    pub fn parse(name: &str) -> Result<Self, RunnerError> {
        match name.trim().to_lowercase().as_str() {
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(RunnerError::Config(format!("unknown backend type: {other}"))),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `LLM_BACKEND` -- backend type (`openai`, `anthropic`, ...)
    /// - `LLM_API_URL` -- API base URL
    /// - `LLM_API_KEY` -- API key
    /// - `LLM_MODEL` -- model name
    ///
    /// Optional variables:
    /// - `LLM_TEMPERATURE` -- sampling temperature (default 0.5)
    /// - `LLM_STOP` -- stop sequence (default `}`; empty disables it)
    /// - `LLM_MAX_TOKENS` -- completion cap (default 256)
    /// - `TEMPLATES_DIR` -- prompt template override directory
    pub fn from_env() -> Result<Self, RunnerError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RunnerError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| RunnerError::Config(format!("missing required env var {name}")))
        };

        let backend_type = BackendType::parse(&required("LLM_BACKEND")?)?;
        let api_url = required("LLM_API_URL")?;
        let api_key = required("LLM_API_KEY")?;
        let model = required("LLM_MODEL")?;

        let temperature: f32 = lookup("LLM_TEMPERATURE")
            .map_or(Ok(DEFAULT_TEMPERATURE), |v| v.trim().parse())
            .map_err(|e| RunnerError::Config(format!("invalid LLM_TEMPERATURE: {e}")))?;

        let stop = match lookup("LLM_STOP") {
            Some(v) if v.is_empty() => Vec::new(),
            Some(v) => vec![v],
            None => vec![DEFAULT_STOP.to_owned()],
        };

        let max_tokens: u32 = lookup("LLM_MAX_TOKENS")
            .map_or(Ok(DEFAULT_MAX_TOKENS), |v| v.trim().parse())
            .map_err(|e| RunnerError::Config(format!("invalid LLM_MAX_TOKENS: {e}")))?;

        let templates_dir = Self::templates_dir_from_vars(&lookup);

        Ok(Self {
            backend: LlmBackendConfig {
                backend_type,
                api_url: api_url.trim_end_matches('/').to_owned(),
                api_key,
                model,
                params: CompletionParams {
                    temperature,
                    stop,
                    max_tokens,
                },
            },
            templates_dir,
        })
    }

    /// Template override directory from the process environment.
    ///
    /// Offline runs need this without any backend variables set.
    pub fn templates_dir_from_env() -> Option<String> {
        Self::templates_dir_from_vars(|name| std::env::var(name).ok())
    }

    /// Template override directory through an arbitrary variable lookup.
    /// Blank values count as unset.
    pub fn templates_dir_from_vars(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        lookup(TEMPLATES_DIR_VAR).filter(|v| !v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("LLM_BACKEND", "openai"),
        ("LLM_API_URL", "https://api.openai.com/v1/"),
        ("LLM_API_KEY", "test-key"),
        ("LLM_MODEL", "gpt-4o-mini"),
    ];

    #[test]
    fn templates_dir_needs_no_backend_vars() {
        let env = vars(&[("TEMPLATES_DIR", "prompts")]);
        assert!(RunnerConfig::from_vars(|k| env.get(k).cloned()).is_err());
        assert_eq!(
            RunnerConfig::templates_dir_from_vars(|k| env.get(k).cloned()).as_deref(),
            Some("prompts")
        );

        let blank = vars(&[("TEMPLATES_DIR", "  ")]);
        assert!(RunnerConfig::templates_dir_from_vars(|k| blank.get(k).cloned()).is_none());
    }

    #[test]
    fn backend_type_parsing() {
        assert!(matches!(BackendType::parse("OpenAI"), Ok(BackendType::OpenAi)));
        assert!(matches!(BackendType::parse("ollama"), Ok(BackendType::OpenAi)));
        assert!(matches!(BackendType::parse("claude"), Ok(BackendType::Anthropic)));
        assert!(BackendType::parse("curie").is_err());
    }

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let env = vars(&REQUIRED);
        let config = RunnerConfig::from_vars(|k| env.get(k).cloned());
        assert!(config.is_ok());
        let Ok(config) = config else { return };

        assert_eq!(config.backend.backend_type, BackendType::OpenAi);
        assert_eq!(config.backend.api_url, "https://api.openai.com/v1");
        assert_eq!(config.backend.params, CompletionParams::default());
        assert!(config.templates_dir.is_none());
    }

    #[test]
    fn optional_vars_override_defaults() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("LLM_TEMPERATURE", "0.9"),
            ("LLM_STOP", ""),
            ("LLM_MAX_TOKENS", "64"),
            ("TEMPLATES_DIR", "prompts"),
        ]);
        let env = vars(&pairs);
        let config = RunnerConfig::from_vars(|k| env.get(k).cloned());
        assert!(config.is_ok());
        let Ok(config) = config else { return };

        assert!((config.backend.params.temperature - 0.9).abs() < f32::EPSILON);
        assert!(config.backend.params.stop.is_empty());
        assert_eq!(config.backend.params.max_tokens, 64);
        assert_eq!(config.templates_dir.as_deref(), Some("prompts"));
    }

    #[test]
    fn missing_required_var_is_config_error() {
        let env = vars(&[
            ("LLM_BACKEND", "openai"),
            ("LLM_API_URL", "https://api.openai.com/v1"),
            ("LLM_API_KEY", "test-key"),
        ]);
        let result = RunnerConfig::from_vars(|k| env.get(k).cloned());
        assert!(matches!(result, Err(RunnerError::Config(msg)) if msg.contains("LLM_MODEL")));
    }

    #[test]
    fn invalid_temperature_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("LLM_TEMPERATURE", "warm"));
        let env = vars(&pairs);
        assert!(RunnerConfig::from_vars(|k| env.get(k).cloned()).is_err());
    }
}
