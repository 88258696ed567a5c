use std::fmt::Write as _;

use crossterm::style::{Attribute, SetAttribute, SetForegroundColor};

use livelog_types::{Level, LogLine, MalformedLineError};
use unicode_width::UnicodeWidthStr;

/// Separator shown between the timestamp and the message in colored output
const MESSAGE_SEPARATOR: &str = " - ";

/// Splits raw chunks into lines and renders them for display.
///
/// An unterminated trailing fragment is held back and prepended to the next
/// chunk, so a line split across two reads is delivered exactly once.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Bytes after the last newline seen so far
    pending: Vec<u8>,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a chunk into complete lines, each keeping its trailing `\n`
    pub fn split(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete
            .split_inclusive(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Split a chunk and tag each complete line with its level
    pub fn parse(&mut self, chunk: &[u8]) -> Vec<Result<(Level, String), MalformedLineError>> {
        self.split(chunk)
            .into_iter()
            .map(|line| Self::level_of(&line).map(|level| (level, line)))
            .collect()
    }

    /// Number of buffered bytes waiting for their newline
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop any buffered fragment (the file was truncated)
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Read the level token from the first 4 characters of a line
    pub fn level_of(line: &str) -> Result<Level, MalformedLineError> {
        line.get(..LogLine::LEVEL_WIDTH)
            .and_then(Level::from_token)
            .ok_or_else(|| MalformedLineError::new(line.trim_end_matches('\n')))
    }

    /// Render a raw line for display.
    ///
    /// With colors, the level token is replaced by styling: a dim timestamp,
    /// a bright separator and the message in the level's color. Lines whose
    /// columns cannot be sliced are returned unchanged.
    pub fn colorize(line: &str, color_enabled: bool) -> String {
        if !color_enabled {
            return line.to_string();
        }

        let Some((level, timestamp, message)) = Self::styled_parts(line) else {
            return line.to_string();
        };

        let mut out = String::with_capacity(line.len() + 32);
        let _ = write!(
            out,
            "{}{}{}{}{}{}{}{}",
            SetAttribute(Attribute::Dim),
            timestamp,
            SetAttribute(Attribute::Bold),
            MESSAGE_SEPARATOR,
            SetAttribute(Attribute::NormalIntensity),
            SetForegroundColor(level.color()),
            message,
            SetAttribute(Attribute::Reset),
        );
        if line.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    /// Terminal columns taken by `colorize(line, color_enabled)`, newline
    /// excluded
    pub fn display_width(line: &str, color_enabled: bool) -> usize {
        match Self::styled_parts(line) {
            Some((_, timestamp, message)) if color_enabled => {
                timestamp.width() + MESSAGE_SEPARATOR.len() + message.trim_end_matches('\r').width()
            }
            _ => line.trim_end_matches(['\n', '\r']).width(),
        }
    }

    /// Level, timestamp and message of a line that can be styled
    fn styled_parts(line: &str) -> Option<(Level, &str, &str)> {
        let level = Self::level_of(line).ok()?;
        let body = line.strip_suffix('\n').unwrap_or(line);
        let timestamp = body.get(LogLine::TIMESTAMP_START..LogLine::TIMESTAMP_END)?;
        let message = body.get(LogLine::MESSAGE_START..)?;
        Some((level, timestamp, message))
    }
}
