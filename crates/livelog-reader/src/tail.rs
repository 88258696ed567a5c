use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, info};

use crate::buffer::Scrollback;
use crate::codec::LineCodec;
use crate::config::ReaderConfig;
use crate::cursor::CursorTracker;
use crate::error::ReaderError;
use crate::filter::LevelFilter;
use crate::render::{Frame, RenderSink};

/// Message shown while the target file does not exist
pub const WAITING_MESSAGE: &str = "File not found, waiting for creation.\n";

/// Upper bound on the buffer reserved before a read; larger reads grow it
const READ_RESERVE: u64 = 64 * 1024;

/// Lifecycle of a tail session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    /// The file has never been seen
    AwaitingFile,
    /// The file exists and changes are being followed
    Watching,
    /// The session has ended
    Stopped,
}

/// Result of handling one change notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The file still does not exist; the waiting frame was shown
    Waiting,
    /// No new bytes since the last pass
    Unchanged,
    /// New bytes were read but no complete line passed the filter
    Filtered,
    /// A frame was rendered with this many new lines
    Rendered(usize),
    /// The file could not be read this time; retried on the next event
    Unavailable,
    /// The session is stopped and ignores events
    Stopped,
}

/// Follows one log file: reads appended bytes, filters and colors complete
/// lines, and renders the result.
pub struct TailReader<S> {
    config: ReaderConfig,
    state: ReaderState,
    cursor: CursorTracker,
    codec: LineCodec,
    filter: LevelFilter,
    scrollback: Scrollback,
    sink: S,
}

impl<S: RenderSink> TailReader<S> {
    /// Create a session after validating the target path.
    ///
    /// Nothing is read or rendered until the first [`TailReader::on_change`].
    pub fn new(config: ReaderConfig, sink: S) -> Result<Self, ReaderError> {
        config.validate()?;
        debug!(
            path = %config.path.display(),
            min_level = %config.min_level,
            colors = config.color_enabled,
            "tail session created"
        );

        Ok(Self {
            state: ReaderState::AwaitingFile,
            cursor: CursorTracker::new(),
            codec: LineCodec::new(),
            filter: LevelFilter::new(config.min_level),
            scrollback: Scrollback::new(config.history),
            config,
            sink,
        })
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Bytes delivered so far
    pub fn cursor(&self) -> u64 {
        self.cursor.position()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// End the session; later events are ignored
    pub fn stop(&mut self) {
        if self.state != ReaderState::Stopped {
            debug!(path = %self.config.path.display(), "tail session stopped");
        }
        self.state = ReaderState::Stopped;
    }

    /// Handle one change notification or poll tick
    pub fn on_change(&mut self) -> Result<Outcome, ReaderError> {
        match self.state {
            ReaderState::Stopped => Ok(Outcome::Stopped),
            ReaderState::AwaitingFile => {
                if !self.config.path.is_file() {
                    self.render(Frame::Waiting(WAITING_MESSAGE.to_string()))?;
                    return Ok(Outcome::Waiting);
                }
                info!(path = %self.config.path.display(), "file found, watching");
                self.state = ReaderState::Watching;
                self.read_pass()
            }
            ReaderState::Watching => self.read_pass(),
        }
    }

    fn read_pass(&mut self) -> Result<Outcome, ReaderError> {
        let chunk = match self.read_new_bytes() {
            Ok(Some(chunk)) => chunk,
            Ok(None) => return Ok(Outcome::Unchanged),
            Err(e) => {
                debug!(path = %self.config.path.display(), error = %e, "file unavailable, retrying later");
                return Ok(Outcome::Unavailable);
            }
        };

        let mut shown = 0;
        for parsed in self.codec.parse(&chunk.bytes) {
            match parsed {
                Ok((level, line)) if self.filter.passes(level) => {
                    let color = self.config.color_enabled;
                    let width = LineCodec::display_width(&line, color);
                    self.scrollback.push(LineCodec::colorize(&line, color), width);
                    shown += 1;
                }
                Ok(_) => {}
                Err(e) => debug!(error = %e, "skipping line"),
            }
        }

        if shown == 0 && !chunk.truncated {
            return Ok(Outcome::Filtered);
        }

        let body = self.scrollback.compose(self.sink.viewport());
        self.render(Frame::Lines(body))?;
        Ok(Outcome::Rendered(shown))
    }

    /// Read the bytes between the cursor and the end of the file.
    ///
    /// Returns `None` when there is nothing new and the file was not
    /// truncated. A truncation clears the carried fragment and scrollback.
    fn read_new_bytes(&mut self) -> io::Result<Option<Chunk>> {
        let mut file = File::open(&self.config.path)?;
        let size = file.metadata()?.len();

        let delta = self.cursor.compute_delta(size);
        if delta.truncated {
            info!(
                path = %self.config.path.display(),
                size,
                "file shrank below read position, reading from the start"
            );
            self.codec.reset();
            self.scrollback.clear();
        } else if delta.is_empty() {
            return Ok(None);
        }

        file.seek(SeekFrom::Start(delta.start))?;
        let mut bytes = Vec::with_capacity(delta.len.min(READ_RESERVE) as usize);
        file.take(delta.len).read_to_end(&mut bytes)?;
        self.cursor.advance(bytes.len() as u64);

        Ok(Some(Chunk {
            bytes,
            truncated: delta.truncated,
        }))
    }

    fn render(&mut self, frame: Frame) -> Result<(), ReaderError> {
        self.sink.render(&frame).map_err(ReaderError::Render)
    }
}

/// Bytes read in one pass
struct Chunk {
    bytes: Vec<u8>,
    truncated: bool,
}
