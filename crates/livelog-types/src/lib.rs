//! Shared types for livelog
//!
//! This crate contains the log line model shared by the reader and the
//! companion logger, so both sides agree on the on-disk format.

mod error;
mod path;

use chrono::NaiveTime;
use crossterm::style::Color;

pub use error::{ConfigError, MalformedLineError};
pub use path::{default_log_path, validate_log_path};

// ============================================================================
// Log Levels
// ============================================================================

/// Log severity level, ordered from least to most severe
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    #[default]
    Debug,
    Info,
    Warning,
    Error,
}

impl Level {
    /// All levels in rank order
    pub const ALL: [Level; 4] = [Self::Debug, Self::Info, Self::Warning, Self::Error];

    /// Parse a user-supplied level name (`DEBUG`, `INFO`, `WARNING`, `ERROR`),
    /// ignoring case
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            _ => Err(ConfigError::UnknownLevel(name.to_string())),
        }
    }

    /// Parse the 4-character token written at column 0 of a log line
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "DBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARN" => Some(Self::Warning),
            "ERR!" => Some(Self::Error),
            _ => None,
        }
    }

    /// The 4-character token written to the log file
    pub fn token(&self) -> &'static str {
        match self {
            Self::Debug => "DBUG",
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERR!",
        }
    }

    /// Long name, as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Rank used for filtering: DEBUG=0, INFO=1, WARNING=2, ERROR=3
    pub fn rank(&self) -> u8 {
        match self {
            Self::Debug => 0,
            Self::Info => 1,
            Self::Warning => 2,
            Self::Error => 3,
        }
    }

    /// Display color for the message part of a line
    pub fn color(&self) -> Color {
        match self {
            Self::Debug => Color::Grey,
            Self::Info => Color::DarkBlue,
            Self::Warning => Color::DarkYellow,
            Self::Error => Color::DarkRed,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Log Lines
// ============================================================================

/// A single persisted log line: `LLLL | HH:MM:SS.mmm - message\n`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub timestamp: NaiveTime,
    pub message: String,
}

impl LogLine {
    /// Width of the level token
    pub const LEVEL_WIDTH: usize = 4;
    /// Byte offset where the timestamp starts
    pub const TIMESTAMP_START: usize = 7;
    /// Byte offset just past the timestamp
    pub const TIMESTAMP_END: usize = 19;
    /// Byte offset where the message starts
    pub const MESSAGE_START: usize = 22;

    const LEVEL_SEPARATOR: &'static str = " | ";
    const MESSAGE_SEPARATOR: &'static str = " - ";
    const TIMESTAMP_FORMAT: &'static str = "%H:%M:%S%.3f";

    pub fn new(level: Level, timestamp: NaiveTime, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp,
            message: message.into(),
        }
    }

    /// Render the line in its on-disk form, newline included.
    ///
    /// Line breaks inside the message are flattened to spaces so one call
    /// always produces exactly one line.
    pub fn encode(&self) -> String {
        let message = self.message.replace(['\r', '\n'], " ");
        format!(
            "{}{}{}{}{}\n",
            self.level.token(),
            Self::LEVEL_SEPARATOR,
            self.timestamp.format(Self::TIMESTAMP_FORMAT),
            Self::MESSAGE_SEPARATOR,
            message
        )
    }

    /// Strictly parse a raw line (with or without its trailing newline)
    pub fn decode(raw: &str) -> Result<Self, MalformedLineError> {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let malformed = || MalformedLineError::new(line);

        let level = line
            .get(..Self::LEVEL_WIDTH)
            .and_then(Level::from_token)
            .ok_or_else(malformed)?;
        if line.get(Self::LEVEL_WIDTH..Self::TIMESTAMP_START) != Some(Self::LEVEL_SEPARATOR) {
            return Err(malformed());
        }
        let timestamp = line
            .get(Self::TIMESTAMP_START..Self::TIMESTAMP_END)
            .and_then(|ts| NaiveTime::parse_from_str(ts, Self::TIMESTAMP_FORMAT).ok())
            .ok_or_else(malformed)?;
        if line.get(Self::TIMESTAMP_END..Self::MESSAGE_START) != Some(Self::MESSAGE_SEPARATOR) {
            return Err(malformed());
        }

        Ok(Self {
            level,
            timestamp,
            message: line[Self::MESSAGE_START..].to_string(),
        })
    }
}
