//! Terminal boundary for livelog
//!
//! This crate writes frames to the terminal and listens for the input that
//! ends a session.

mod stop;
mod terminal;

pub use stop::StopListener;
pub use terminal::TerminalSink;
