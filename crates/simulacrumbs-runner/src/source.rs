//! Completion source trait and stub implementation.
//!
//! A [`CompletionSource`] turns a fully rendered prompt into raw model text.
//! It could be an HTTP backend, a scripted test double, or the offline
//! [`StubSource`]. Requests return `'static` boxed futures so the worker
//! pool can spawn them without borrowing the agent that asked.

use futures::future::BoxFuture;

use crate::error::RunnerError;
use crate::llm::LlmBackend;

/// Anything that can answer a decision prompt.
pub trait CompletionSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Start a completion for `prompt`.
    ///
    /// The returned future resolves to the raw completion text or the reason
    /// the call failed. Implementations must not block the caller.
    fn request(&self, prompt: String) -> BoxFuture<'static, Result<String, RunnerError>>;
}

impl CompletionSource for LlmBackend {
    fn name(&self) -> &str {
        Self::name(self)
    }

    fn request(&self, prompt: String) -> BoxFuture<'static, Result<String, RunnerError>> {
        let backend = self.clone();
        Box::pin(async move { backend.complete(&prompt).await })
    }
}

/// Canned reply used by [`StubSource::default`]: the body of a "stay"
/// decision, braces stripped the way a real completion arrives.
pub const STUB_REPLY: &str =
    r#""action": "stay", "thought": "I am waiting to see what happens", "speak": "", "emotion": "neutral""#;

/// A completion source that always answers with the same text.
///
/// Used for offline runs where no LLM backend is configured.
#[derive(Debug, Clone)]
pub struct StubSource {
    reply: String,
}

impl StubSource {
    /// Create a stub that always replies with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl Default for StubSource {
    fn default() -> Self {
        Self::new(STUB_REPLY)
    }
}

impl CompletionSource for StubSource {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn request(&self, _prompt: String) -> BoxFuture<'static, Result<String, RunnerError>> {
        let reply = self.reply.clone();
        Box::pin(async move { Ok(reply) })
    }
}
