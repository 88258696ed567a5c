use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use livelog_reader::{ConfigError, ReaderConfig};
use livelog_types::default_log_path;

/// livelog - Live read a log file
#[derive(Parser, Debug, Default)]
#[command(name = "livelog")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log file to be read
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Minimum log level (ERROR, WARNING, INFO or DEBUG). Default: DEBUG
    #[arg(short, long)]
    pub level: Option<String>,

    /// Do not color lines
    #[arg(long)]
    pub nocolors: bool,

    /// Number of lines kept for redrawing
    #[arg(long)]
    pub history: Option<usize>,

    /// TOML file providing defaults for the options above
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write sample lines to the file instead of reading it
    #[arg(long)]
    pub demo: bool,
}

/// Optional settings file; every key may be omitted
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub file: Option<PathBuf>,
    pub level: Option<String>,
    pub nocolors: Option<bool>,
    pub history: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// Settings after merging flags, config file and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub path: PathBuf,
    pub level: String,
    pub nocolors: bool,
    pub history: usize,
}

impl Settings {
    /// Flags win over the config file, which wins over built-in defaults
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: &Args, file: FileConfig) -> Self {
        Self {
            path: args
                .file
                .clone()
                .or(file.file)
                .unwrap_or_else(default_log_path),
            level: args
                .level
                .clone()
                .or(file.level)
                .unwrap_or_else(|| "DEBUG".to_string()),
            nocolors: args.nocolors || file.nocolors.unwrap_or(false),
            history: args
                .history
                .or(file.history)
                .unwrap_or(ReaderConfig::DEFAULT_HISTORY),
        }
    }

    pub fn reader_config(&self) -> Result<ReaderConfig, ConfigError> {
        let config = ReaderConfig::new(&self.path, &self.level, !self.nocolors)?
            .with_history(self.history);
        config.validate()?;
        Ok(config)
    }
}
