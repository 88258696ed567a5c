use std::collections::VecDeque;

use crate::render::Viewport;

/// A rendered line kept for redrawing
#[derive(Clone, Debug)]
struct Entry {
    /// Display string (possibly styled), newline included
    display: String,
    /// Terminal columns the line takes, used to count wrapped rows
    width: usize,
}

/// Bounded scrollback of lines that passed the filter
#[derive(Debug)]
pub struct Scrollback {
    /// Internal storage
    entries: VecDeque<Entry>,

    /// Maximum capacity
    capacity: usize,
}

impl Scrollback {
    /// Create a new scrollback with the given capacity
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Push a rendered line taking `width` columns, evicting the oldest if at
    /// capacity
    pub fn push(&mut self, display: String, width: usize) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Entry { display, width });
    }

    /// Total entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the scrollback is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Concatenate the most recent lines that fit in `viewport`.
    ///
    /// Long lines count for every row they wrap onto. The last row is left
    /// free so the trailing newline does not scroll the frame. The newest
    /// line is always included, even when it alone overflows the viewport.
    /// Without a viewport every entry is included.
    pub fn compose(&self, viewport: Option<Viewport>) -> String {
        let start = match viewport {
            Some(viewport) => self.first_visible(viewport),
            None => 0,
        };

        self.entries
            .iter()
            .skip(start)
            .map(|e| e.display.as_str())
            .collect()
    }

    fn first_visible(&self, viewport: Viewport) -> usize {
        let cols = usize::from(viewport.cols.max(1));
        let mut budget = usize::from(viewport.rows.saturating_sub(1).max(1));
        let mut start = self.entries.len();

        for entry in self.entries.iter().rev() {
            let rows = entry.width.div_ceil(cols).max(1);
            if rows > budget && start < self.entries.len() {
                break;
            }
            budget = budget.saturating_sub(rows);
            start -= 1;
        }

        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_raw(buffer: &mut Scrollback, raw: &str) {
        buffer.push(raw.to_string(), raw.trim_end().len());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut buffer = Scrollback::new(2);
        push_raw(&mut buffer, "a\n");
        push_raw(&mut buffer, "b\n");
        push_raw(&mut buffer, "c\n");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.compose(None), "b\nc\n");
    }

    #[test]
    fn test_compose_fits_viewport() {
        let mut buffer = Scrollback::new(100);
        for line in ["1\n", "2\n", "3\n", "4\n"] {
            push_raw(&mut buffer, line);
        }
        let frame = buffer.compose(Some(Viewport { cols: 80, rows: 3 }));
        assert_eq!(frame, "3\n4\n");
    }

    #[test]
    fn test_compose_counts_wrapped_rows() {
        let mut buffer = Scrollback::new(100);
        push_raw(&mut buffer, "short\n");
        push_raw(&mut buffer, &format!("{}\n", "x".repeat(25)));
        // 25 columns at width 10 wrap onto 3 rows, leaving no room for "short"
        let frame = buffer.compose(Some(Viewport { cols: 10, rows: 4 }));
        assert_eq!(frame, format!("{}\n", "x".repeat(25)));
    }

    #[test]
    fn test_width_ignores_styling() {
        let mut buffer = Scrollback::new(10);
        buffer.push("\u{1b}[2mab\u{1b}[0m\n".to_string(), 2);
        buffer.push("\u{1b}[2mcd\u{1b}[0m\n".to_string(), 2);
        let frame = buffer.compose(Some(Viewport { cols: 2, rows: 3 }));
        assert_eq!(frame, "\u{1b}[2mab\u{1b}[0m\n\u{1b}[2mcd\u{1b}[0m\n");
    }

    #[test]
    fn test_newest_line_shown_when_taller_than_viewport() {
        let mut buffer = Scrollback::new(10);
        push_raw(&mut buffer, "older\n");
        push_raw(&mut buffer, &format!("{}\n", "x".repeat(100)));
        let frame = buffer.compose(Some(Viewport { cols: 10, rows: 4 }));
        assert_eq!(frame, format!("{}\n", "x".repeat(100)));
    }

    #[test]
    fn test_clear() {
        let mut buffer = Scrollback::new(10);
        push_raw(&mut buffer, "a\n");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.compose(None), "");
    }
}
