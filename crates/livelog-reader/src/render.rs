use std::io;

/// Visible terminal area in character cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

/// One complete screen update
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// The watched file does not exist yet
    Waiting(String),
    /// Filtered, rendered lines, newlines included
    Lines(String),
}

impl Frame {
    /// Text written after the screen is cleared
    pub fn body(&self) -> &str {
        match self {
            Self::Waiting(message) | Self::Lines(message) => message,
        }
    }
}

/// Destination of rendered frames.
///
/// Each call to [`RenderSink::render`] must replace the whole screen: clear,
/// then write the frame body as a single unit.
pub trait RenderSink {
    fn render(&mut self, frame: &Frame) -> io::Result<()>;

    /// Size of the output area, or `None` when unbounded
    fn viewport(&self) -> Option<Viewport> {
        None
    }
}

/// Sink that keeps every frame in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Vec<Frame>,
    viewport: Option<Viewport>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a fixed viewport to the reader
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// All frames rendered so far
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The most recent frame
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl RenderSink for MemorySink {
    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}
