use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::ReaderError;
use crate::render::RenderSink;
use crate::source::{ChangeSource, open_source};
use crate::tail::{ReaderState, TailReader};

/// Timing of a session's blocking waits
#[derive(Clone, Copy, Debug)]
pub struct SessionTiming {
    /// How often a missing file is checked for
    pub await_interval: Duration,
    /// Polling period when the native watch is unavailable
    pub poll_interval: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            await_interval: Duration::from_secs(1),
            poll_interval: crate::source::POLL_INTERVAL,
        }
    }
}

/// Drive `reader` until `cancel` fires: wait for the file, show its current
/// content, then handle change events one at a time.
///
/// The change source is dropped (and its watch released) on every exit path.
pub async fn run_session<S: RenderSink>(
    reader: &mut TailReader<S>,
    timing: SessionTiming,
    cancel: &CancellationToken,
) -> Result<(), ReaderError> {
    let result = follow(reader, timing, cancel).await;
    reader.stop();
    result
}

async fn follow<S: RenderSink>(
    reader: &mut TailReader<S>,
    timing: SessionTiming,
    cancel: &CancellationToken,
) -> Result<(), ReaderError> {
    let mut ticker = tokio::time::interval(timing.await_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first pass that finds the file doubles as the initial full read
    while reader.state() == ReaderState::AwaitingFile {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = ticker.tick() => {
                reader.on_change()?;
            }
        }
    }

    let mut source: Box<dyn ChangeSource> = open_source(reader.path(), timing.poll_interval);
    info!(path = %reader.path().display(), source = ?source.kind(), "following file");

    // Catch writes that landed before the watch was registered
    reader.on_change()?;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            event = source.next_change() => match event {
                Some(_) => {
                    reader.on_change()?;
                }
                None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::OpenOptions;
    use std::io::Write;

    use super::*;
    use crate::config::ReaderConfig;
    use crate::render::{Frame, MemorySink};

    fn fast() -> SessionTiming {
        SessionTiming {
            await_interval: Duration::from_millis(20),
            poll_interval: Duration::from_millis(20),
        }
    }

    #[tokio::test]
    async fn test_session_waits_then_follows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.log");
        let config = ReaderConfig::new(&path, "INFO", false).unwrap();
        let mut reader = TailReader::new(config, MemorySink::new()).unwrap();
        let cancel = CancellationToken::new();

        let writer = {
            let path = path.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                std::fs::write(&path, "DBUG | 10:00:00.000 - hidden\nINFO | 10:00:00.001 - first\n")
                    .unwrap();
                tokio::time::sleep(Duration::from_millis(100)).await;
                let mut file = OpenOptions::new().append(true).open(&path).unwrap();
                file.write_all(b"ERR! | 10:00:00.002 - second\n").unwrap();
                tokio::time::sleep(Duration::from_millis(300)).await;
                cancel.cancel();
            })
        };

        tokio::time::timeout(Duration::from_secs(10), run_session(&mut reader, fast(), &cancel))
            .await
            .unwrap()
            .unwrap();
        writer.await.unwrap();

        assert_eq!(reader.state(), ReaderState::Stopped);
        let frames = reader.sink().frames();
        assert!(matches!(frames.first(), Some(Frame::Waiting(_))));
        assert_eq!(
            frames.last().unwrap().body(),
            "INFO | 10:00:00.001 - first\nERR! | 10:00:00.002 - second\n"
        );
    }

    #[tokio::test]
    async fn test_cancel_while_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReaderConfig::new(dir.path().join("never.log"), "DEBUG", false).unwrap();
        let mut reader = TailReader::new(config, MemorySink::new()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        run_session(&mut reader, fast(), &cancel).await.unwrap();
        assert_eq!(reader.state(), ReaderState::Stopped);
    }
}
