//! Live tail reading for livelog
//!
//! This crate follows a single log file: it tracks a byte cursor across
//! change notifications, splits new bytes into lines, filters them by level,
//! colors them and hands complete frames to a [`RenderSink`].

mod buffer;
mod codec;
mod config;
mod cursor;
mod error;
mod filter;
mod render;
mod session;
mod source;
mod tail;

pub use buffer::Scrollback;
pub use codec::LineCodec;
pub use config::ReaderConfig;
pub use cursor::{CursorTracker, Delta};
pub use error::ReaderError;
pub use filter::LevelFilter;
pub use render::{Frame, MemorySink, RenderSink, Viewport};
pub use session::{SessionTiming, run_session};
pub use source::{
    ChangeEvent, ChangeSource, NotifySource, POLL_INTERVAL, PollSource, SourceKind, open_source,
};
pub use tail::{Outcome, ReaderState, TailReader, WAITING_MESSAGE};

// Re-export types used in our public API
pub use livelog_types::{ConfigError, Level, LogLine, MalformedLineError};
