//! Error types for the `simulacrumbs` binary.

/// Top-level error for the binary.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Simulation configuration could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: simulacrumbs_core::ConfigError,
    },

    /// Backend configuration or prompt templates could not be set up.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: simulacrumbs_runner::RunnerError,
    },

    /// `main` is not running inside a tokio runtime.
    #[error("no async runtime available for the decision pool")]
    NoRuntime,
}
