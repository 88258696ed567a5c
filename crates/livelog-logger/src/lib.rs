//! Write side of livelog
//!
//! [`Logger`] appends `LLLL | HH:MM:SS.mmm - message` lines to the file a
//! livelog reader follows. It is a cheap, cloneable handle: pass it to
//! whatever needs to log instead of reaching for a global.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use livelog_types::{ConfigError, Level, LogLine, default_log_path, validate_log_path};

/// Errors raised by the logger
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Logger settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Output file
    pub path: PathBuf,
    /// Messages below this level are dropped
    pub min_level: Level,
    /// When false, every write is a no-op
    pub enabled: bool,
    /// Truncate a preexisting file at construction
    pub erase: bool,
}

impl LoggerConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the minimum level from a user-supplied name, ignoring case
    pub fn with_level(mut self, name: &str) -> Result<Self, ConfigError> {
        self.min_level = Level::from_name(name)?;
        Ok(self)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn erase(mut self, erase: bool) -> Self {
        self.erase = erase;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            min_level: Level::Debug,
            enabled: true,
            erase: true,
        }
    }
}

#[derive(Debug)]
struct LoggerState {
    path: PathBuf,
    min_level: Level,
    enabled: bool,
}

/// Shared handle to a log file; clones write to the same file and see the
/// same level
#[derive(Clone, Debug)]
pub struct Logger {
    state: Arc<Mutex<LoggerState>>,
}

impl Logger {
    /// Validate the path and, when `erase` is set, empty an existing file
    pub fn new(config: LoggerConfig) -> Result<Self, LoggerError> {
        validate_log_path(&config.path)?;

        if config.erase && config.path.is_file() {
            File::create(&config.path).map_err(|source| LoggerError::Io {
                path: config.path.clone(),
                source,
            })?;
            debug!(path = %config.path.display(), "erased existing log file");
        }

        Ok(Self {
            state: Arc::new(Mutex::new(LoggerState {
                path: config.path,
                min_level: config.min_level,
                enabled: config.enabled,
            })),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.state.lock().path.clone()
    }

    pub fn level(&self) -> Level {
        self.state.lock().min_level
    }

    /// Change the minimum level, ignoring case
    pub fn set_level(&self, name: &str) -> Result<(), LoggerError> {
        let level = Level::from_name(name)?;
        self.state.lock().min_level = level;
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    pub fn debug(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Debug, message)
    }

    pub fn info(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Info, message)
    }

    pub fn warn(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Warning, message)
    }

    pub fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Error, message)
    }

    /// Append one line stamped with the current local time
    pub fn log(&self, level: Level, message: &str) -> Result<(), LoggerError> {
        let state = self.state.lock();
        if !state.enabled || level < state.min_level {
            return Ok(());
        }

        let line = LogLine::new(level, Local::now().time(), message).encode();
        append(&state.path, &line).map_err(|source| LoggerError::Io {
            path: state.path.clone(),
            source,
        })
    }
}

/// The file is reopened on every write so a rotated file is picked up
fn append(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        (dir, path)
    }

    fn write_all_levels(logger: &Logger) {
        logger.debug("0").unwrap();
        logger.info("1").unwrap();
        logger.warn("2").unwrap();
        logger.error("3").unwrap();
    }

    /// Decoded (level, message) pairs; panics on any malformed line
    fn read_lines(path: &Path) -> Vec<(Level, String)> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(|l| {
                let line = LogLine::decode(l).unwrap();
                (line.level, line.message)
            })
            .collect()
    }

    fn messages(path: &Path) -> Vec<String> {
        read_lines(path).into_iter().map(|(_, m)| m).collect()
    }

    #[test]
    fn test_default_writes_every_level() {
        let (_dir, path) = setup();
        let logger = Logger::new(LoggerConfig::new(&path)).unwrap();
        write_all_levels(&logger);

        assert_eq!(
            read_lines(&path),
            vec![
                (Level::Debug, "0".to_string()),
                (Level::Info, "1".to_string()),
                (Level::Warning, "2".to_string()),
                (Level::Error, "3".to_string()),
            ]
        );
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("DBUG | "));
        assert!(raw.contains("\nERR! | "));
    }

    #[test]
    fn test_erase_and_keep() {
        let (_dir, path) = setup();
        write_all_levels(&Logger::new(LoggerConfig::new(&path)).unwrap());

        write_all_levels(&Logger::new(LoggerConfig::new(&path).erase(false)).unwrap());
        assert_eq!(messages(&path).len(), 8);

        write_all_levels(&Logger::new(LoggerConfig::new(&path)).unwrap());
        assert_eq!(messages(&path), vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn test_minimum_levels() {
        for (name, expected) in [
            ("INFO", vec!["1", "2", "3"]),
            ("WARNING", vec!["2", "3"]),
            ("ERROR", vec!["3"]),
            ("iNfO", vec!["1", "2", "3"]),
        ] {
            let (_dir, path) = setup();
            let config = LoggerConfig::new(&path).with_level(name).unwrap();
            write_all_levels(&Logger::new(config).unwrap());
            assert_eq!(messages(&path), expected, "minimum level {name}");
        }
    }

    #[test]
    fn test_disabled_writes_nothing() {
        let (_dir, path) = setup();
        let logger = Logger::new(LoggerConfig::new(&path).enabled(false)).unwrap();
        write_all_levels(&logger);
        assert!(!path.exists());

        logger.set_enabled(true);
        logger.error("on").unwrap();
        assert_eq!(messages(&path), vec!["on"]);
    }

    #[test]
    fn test_clones_share_state() {
        let (_dir, path) = setup();
        let first = Logger::new(LoggerConfig::new(&path)).unwrap();
        let second = first.clone();

        first.debug("0").unwrap();
        second.set_level("warning").unwrap();
        first.info("1").unwrap();
        second.warn("2").unwrap();
        first.error("3").unwrap();

        assert_eq!(first.level(), Level::Warning);
        assert_eq!(messages(&path), vec!["0", "2", "3"]);
    }

    #[test]
    fn test_set_unknown_level_keeps_previous() {
        let (_dir, path) = setup();
        let logger = Logger::new(LoggerConfig::new(&path)).unwrap();
        assert!(matches!(
            logger.set_level("TEST"),
            Err(LoggerError::Config(ConfigError::UnknownLevel(_)))
        ));
        assert_eq!(logger.level(), Level::Debug);
    }

    #[test]
    fn test_unknown_level() {
        let (_dir, path) = setup();
        assert!(LoggerConfig::new(&path).with_level("TEST").is_err());
    }

    #[test]
    fn test_path_is_a_directory() {
        let (dir, _path) = setup();
        assert!(matches!(
            Logger::new(LoggerConfig::new(dir.path())),
            Err(LoggerError::Config(ConfigError::IsADirectory(_)))
        ));
    }

    #[test]
    fn test_wrong_path() {
        assert!(matches!(
            Logger::new(LoggerConfig::new("/foo/bar/test.log")),
            Err(LoggerError::Config(ConfigError::ParentMissing(_)))
        ));
    }

    #[test]
    fn test_message_newlines_stay_on_one_line() {
        let (_dir, path) = setup();
        let logger = Logger::new(LoggerConfig::new(&path)).unwrap();
        logger.info("first\nsecond").unwrap();
        assert_eq!(messages(&path), vec!["first second"]);
    }
}
