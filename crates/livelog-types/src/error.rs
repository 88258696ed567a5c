use std::path::PathBuf;

use thiserror::Error;

/// Errors detected before any watching or writing starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown log level \"{0}\" (expected one of ERROR, WARNING, INFO, DEBUG).")]
    UnknownLevel(String),

    #[error("Provided logging file (\"{}\") is a directory.", .0.display())]
    IsADirectory(PathBuf),

    #[error("Provided logging directory (\"{}\") does not exist or is not a directory.", .0.display())]
    ParentMissing(PathBuf),

    #[error(
        "You do not have permissions to read and/or write to provided logging directory (\"{}\").",
        .0.display()
    )]
    InsufficientPermissions(PathBuf),
}

/// A line that does not start with one of the known level tokens
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed log line: {line:?}")]
pub struct MalformedLineError {
    pub line: String,
}

impl MalformedLineError {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}
