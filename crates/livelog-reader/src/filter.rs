use livelog_types::{ConfigError, Level};

/// Minimum-severity filter for a tail session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelFilter {
    min_level: Level,
}

impl LevelFilter {
    pub fn new(min_level: Level) -> Self {
        Self { min_level }
    }

    /// Build a filter from a user-supplied level name, ignoring case
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Level::from_name(name).map(Self::new)
    }

    /// The configured minimum
    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Check if a line of `level` should be shown
    pub fn passes(&self, level: Level) -> bool {
        level.rank() >= self.min_level.rank()
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}
