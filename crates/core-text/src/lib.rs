//! Byte-oriented text storage: growable lines and the document that orders them.
//!
//! Columns are byte offsets. A line never contains its own terminator; the
//! newline exists only in the on-disk form produced by [`Document::save`].

pub mod document;
pub mod line;

pub use document::{CHUNK_SIZE, Document, DocumentError, INITIAL_LINE_CAPACITY};
pub use line::{HighlightSpan, Line, MIN_CAPACITY};

/// A location inside a document expressed as (line index, byte column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }

    /// Pull the position back inside `line_count` lines whose lengths are
    /// reported by `line_len_fn`. The column may sit at end of line.
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            *self = Self::origin();
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.col > max_len {
            self.col = max_len;
        }
    }

    /// Clamp against the current shape of `doc`.
    pub fn clamp_to_document(&mut self, doc: &Document) {
        self.clamp_to(doc.line_count(), |l| doc.line_len(l).unwrap_or(0));
    }
}
