use std::path::PathBuf;

use livelog_types::{ConfigError, Level, default_log_path, validate_log_path};

/// Immutable settings of one tail session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderConfig {
    /// File being watched
    pub path: PathBuf,

    /// Lines below this level are hidden
    pub min_level: Level,

    /// Whether lines are styled by level
    pub color_enabled: bool,

    /// Number of rendered lines kept for redrawing
    pub history: usize,
}

impl ReaderConfig {
    /// Default scrollback size
    pub const DEFAULT_HISTORY: usize = 10_000;

    /// Create a config from a path and a user-supplied level name
    pub fn new(
        path: impl Into<PathBuf>,
        level_name: &str,
        color_enabled: bool,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            path: path.into(),
            min_level: Level::from_name(level_name)?,
            color_enabled,
            history: Self::DEFAULT_HISTORY,
        })
    }

    /// Set the scrollback size
    pub fn with_history(mut self, history: usize) -> Self {
        self.history = history;
        self
    }

    /// Check the target path before any watching starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_log_path(&self.path)
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            min_level: Level::Debug,
            color_enabled: true,
            history: Self::DEFAULT_HISTORY,
        }
    }
}
