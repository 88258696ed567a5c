use std::io::{self, Stdout, Write, stdout};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, SetAttribute},
    terminal::{self, Clear, ClearType},
};

use livelog_reader::{Frame, RenderSink, Viewport};

/// Fallback when the terminal size cannot be queried
const FALLBACK_VIEWPORT: Viewport = Viewport { cols: 120, rows: 50 };

/// Renders frames to a terminal: clear, then the whole frame in one write
pub struct TerminalSink<W: Write = Stdout> {
    out: W,
    /// Scratch buffer holding one encoded frame
    buffer: Vec<u8>,
}

impl TerminalSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffer: Vec::new(),
        }
    }

    /// Encode a frame: clear screen, home the cursor, reset styles, body
    fn encode(&mut self, frame: &Frame) -> io::Result<()> {
        self.buffer.clear();
        queue!(
            self.buffer,
            Clear(ClearType::All),
            MoveTo(0, 0),
            SetAttribute(Attribute::Reset)
        )?;
        self.buffer.extend_from_slice(frame.body().as_bytes());
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        self.encode(frame)?;
        self.out.write_all(&self.buffer)?;
        self.out.flush()
    }

    fn viewport(&self) -> Option<Viewport> {
        let viewport = match terminal::size() {
            Ok((cols, rows)) if cols > 0 && rows > 0 => Viewport { cols, rows },
            _ => FALLBACK_VIEWPORT,
        };
        Some(viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts `write` calls to check a frame goes out in one piece
    #[derive(Default)]
    struct CountingWriter {
        data: Vec<u8>,
        writes: usize,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_frame_is_cleared_then_written_once() {
        let mut sink = TerminalSink::new(CountingWriter::default());
        let body = "INFO | 10:00:00.001 - info\n";
        sink.render(&Frame::Lines(body.to_string())).unwrap();

        let writer = sink.into_inner();
        assert_eq!(writer.writes, 1);

        let text = String::from_utf8(writer.data).unwrap();
        let clear_at = text.find("\u{1b}[2J").unwrap();
        let body_at = text.find(body).unwrap();
        assert!(clear_at < body_at);
        assert!(text.ends_with(body));
    }

    #[test]
    fn test_each_frame_replaces_the_previous() {
        let mut sink = TerminalSink::new(CountingWriter::default());
        sink.render(&Frame::Waiting("waiting\n".to_string())).unwrap();
        sink.render(&Frame::Lines("ERR! | 10:00:00.003 - error\n".to_string()))
            .unwrap();

        let writer = sink.into_inner();
        assert_eq!(writer.writes, 2);
        let text = String::from_utf8(writer.data).unwrap();
        assert_eq!(text.matches("\u{1b}[2J").count(), 2);
    }

    #[test]
    fn test_viewport_always_reported() {
        let sink = TerminalSink::new(Vec::new());
        let viewport = sink.viewport().unwrap();
        assert!(viewport.cols > 0 && viewport.rows > 0);
    }
}
