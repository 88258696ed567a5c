/// Region of the file that has not been delivered yet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delta {
    /// Offset to start reading from
    pub start: u64,
    /// Number of new bytes available
    pub len: u64,
    /// The file shrank below the cursor and is being read from the start again
    pub truncated: bool,
}

impl Delta {
    /// No new content (a notification that raced ahead of the writer's flush)
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Byte offset of already delivered content
#[derive(Clone, Debug, Default)]
pub struct CursorTracker {
    cursor: u64,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current read position
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Compute the new region for a file of `file_size` bytes.
    ///
    /// Only a file strictly smaller than the cursor counts as truncated; in
    /// that case the cursor resets to 0 and the whole file is the new region.
    pub fn compute_delta(&mut self, file_size: u64) -> Delta {
        if self.cursor > file_size {
            self.cursor = 0;
            return Delta {
                start: 0,
                len: file_size,
                truncated: true,
            };
        }

        Delta {
            start: self.cursor,
            len: file_size - self.cursor,
            truncated: false,
        }
    }

    /// Record `n` bytes as consumed
    pub fn advance(&mut self, n: u64) {
        self.cursor += n;
    }
}
