use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use livelog_logger::{Logger, LoggerConfig, LoggerError};

use crate::config::Settings;

/// Delay between two rounds of sample lines
const DEMO_INTERVAL: Duration = Duration::from_millis(100);

/// Write one line of each level to the configured file until cancelled
pub async fn run(settings: &Settings, cancel: &CancellationToken) -> Result<()> {
    let config = LoggerConfig::new(&settings.path).with_level(&settings.level)?;
    let logger = Logger::new(config)?;
    info!(path = %settings.path.display(), "writing demo lines");

    let mut interval = tokio::time::interval(DEMO_INTERVAL);
    let mut round = 0u64;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                write_round(&logger, round)?;
                round += 1;
            }
        }
    }

    Ok(())
}

fn write_round(logger: &Logger, round: u64) -> Result<(), LoggerError> {
    logger.error(&format!("Something failed (round {round})"))?;
    logger.warn(&format!("Just a warning (round {round})"))?;
    logger.info(&format!("Some information (round {round})"))?;
    logger.debug(&format!("Debugging details (round {round})"))
}
