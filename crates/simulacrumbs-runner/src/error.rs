//! Error types for the decision pipeline.
//!
//! Every variant ends in the same place (the fallback decision), but the
//! variants stay distinct so logs can tell a dead network from a model that
//! cannot spell "left".

/// Errors that can occur while producing a decision.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Failed to load or render a prompt template.
    #[error("template render error: {0}")]
    Template(String),

    /// An LLM backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    LlmBackend(String),

    /// The model response was not parseable JSON.
    #[error("response parse error: {0}")]
    Parse(String),

    /// The model response parsed but did not match the decision schema.
    #[error("response validation error: {0}")]
    Validation(String),

    /// The worker running the model call went away without replying.
    #[error("decision worker dropped before replying")]
    WorkerLost,

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),
}

impl RunnerError {
    /// Short tag naming the failure class, for structured logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Template(_) => "template",
            Self::LlmBackend(_) => "model",
            Self::Parse(_) => "parse",
            Self::Validation(_) => "validation",
            Self::WorkerLost => "worker",
            Self::Config(_) => "config",
        }
    }
}
