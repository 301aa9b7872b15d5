//! Configuration loading and typed config structures for the arena.
//!
//! The canonical configuration lives in `simulacrumbs-config.yaml` next to
//! the binary's working directory. Every field has a default, so an empty
//! file (or no file at all) yields the stock 1600x800 arena with one-second
//! ticks and a five-second decision cadence. LLM credentials are not part
//! of this file; see `simulacrumbs_runner::config`.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use simulacrumbs_types::Bounds;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The file parsed but describes an unusable arena.
    #[error("invalid config: {message}")]
    Invalid {
        /// What is wrong with the values.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Arena geometry and movement.
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Tick and decision timing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Size of the model-call worker pool.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Seed for spawn positions; `None` draws from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            timing: TimingConfig::default(),
            workers: default_workers(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if the values do not describe a usable arena.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values the coordinator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| {
            Err(ConfigError::Invalid {
                message: message.to_owned(),
            })
        };
        if self.workers == 0 {
            return invalid("workers must be at least 1");
        }
        if self.arena.step <= 0 {
            return invalid("arena.step must be positive");
        }
        if self.arena.proximity < 0 {
            return invalid("arena.proximity must not be negative");
        }
        if self.arena.width <= 0 || self.arena.height <= 0 {
            return invalid("arena.width and arena.height must be positive");
        }
        if self.timing.tick_interval_ms == 0 {
            return invalid("timing.tick_interval_ms must be positive");
        }
        Ok(())
    }
}

/// Arena geometry and movement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArenaConfig {
    /// Total window width in pixels, text panels included.
    #[serde(default = "default_width")]
    pub width: i32,

    /// Window height in pixels.
    #[serde(default = "default_height")]
    pub height: i32,

    /// Width of each agent's text panel on the left side.
    #[serde(default = "default_panel_width")]
    pub panel_width: i32,

    /// Pixels moved per movement action.
    #[serde(default = "default_step")]
    pub step: i32,

    /// Distance on each axis within which two agents share a position.
    #[serde(default = "default_proximity")]
    pub proximity: i32,

    /// Horizontal spawn range, as an offset from the arena's left edge.
    #[serde(default = "default_spawn_x")]
    pub spawn_x: SpawnRange,

    /// Vertical spawn range.
    #[serde(default = "default_spawn_y")]
    pub spawn_y: SpawnRange,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            panel_width: default_panel_width(),
            step: default_step(),
            proximity: default_proximity(),
            spawn_x: default_spawn_x(),
            spawn_y: default_spawn_y(),
        }
    }
}

impl ArenaConfig {
    /// The walkable rectangle for a roster of `agent_count` agents.
    ///
    /// One text panel per agent occupies the left of the window, so the
    /// arena starts where the panels end.
    pub fn bounds(&self, agent_count: usize) -> Bounds {
        let panels = i32::try_from(agent_count).unwrap_or(i32::MAX);
        let left = self.panel_width.saturating_mul(panels).min(self.width);
        Bounds::new(left, self.width, 0, self.height)
    }
}

/// A half-open `[start, end)` range of pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SpawnRange {
    /// Inclusive lower end.
    pub start: i32,
    /// Exclusive upper end.
    pub end: i32,
}

/// Tick and decision timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Minimum milliseconds between an agent's completed decisions.
    #[serde(default = "default_move_delay_ms")]
    pub move_delay_ms: u64,

    /// Stop after this many ticks; `None` runs until game over.
    #[serde(default)]
    pub max_ticks: Option<u64>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            move_delay_ms: default_move_delay_ms(),
            max_ticks: None,
        }
    }
}

impl TimingConfig {
    /// Tick interval as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Decision cadence as a [`Duration`].
    pub const fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }
}

const fn default_workers() -> usize {
    3
}

const fn default_width() -> i32 {
    1600
}

const fn default_height() -> i32 {
    800
}

const fn default_panel_width() -> i32 {
    200
}

const fn default_step() -> i32 {
    10
}

const fn default_proximity() -> i32 {
    30
}

const fn default_spawn_x() -> SpawnRange {
    SpawnRange {
        start: 300,
        end: 600,
    }
}

const fn default_spawn_y() -> SpawnRange {
    SpawnRange {
        start: 200,
        end: 600,
    }
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_move_delay_ms() -> u64 {
    5_000
}
