//! Model client, prompt engine and action decoder for Simulacrumbs agents.
//!
//! Everything between "an agent needs a decision" and "here is a validated
//! [`Decision`]" lives here:
//!
//! ```text
//! WorldContext --> PromptEngine --> CompletionSource --> decode --> Decision
//! ```
//!
//! The model is treated as an unreliable oracle. Network failures, malformed
//! JSON and out-of-vocabulary values all degrade to [`Decision::fallback`],
//! so callers never see an error from the decision path.
//!
//! # Modules
//!
//! - [`config`] -- Backend configuration loaded from environment variables.
//! - [`error`] -- [`RunnerError`] with a diagnostic `kind()` tag.
//! - [`llm`] -- HTTP backends (OpenAI-compatible, Anthropic).
//! - [`parse`] -- The total decoder from raw text to [`Decision`].
//! - [`prompt`] -- `minijinja` templates for world context and decision prompts.
//! - [`source`] -- The [`CompletionSource`] seam and an offline stub.
//!
//! [`Decision`]: simulacrumbs_types::Decision
//! [`Decision::fallback`]: simulacrumbs_types::Decision::fallback
//! [`RunnerError`]: error::RunnerError
//! [`CompletionSource`]: source::CompletionSource

pub mod config;
pub mod error;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod source;

pub use config::{BackendType, CompletionParams, LlmBackendConfig, RunnerConfig};
pub use error::RunnerError;
pub use llm::{LlmBackend, create_backend};
pub use parse::{decode, decode_completion, try_decode};
pub use prompt::PromptEngine;
pub use source::{CompletionSource, StubSource};
