//! Growable byte line with an explicit capacity policy.
//!
//! `Line` tracks its own logical capacity instead of relying on `Vec`'s growth
//! curve, so allocation behavior is deterministic and testable:
//!
//! * storage starts at [`MIN_CAPACITY`] slots;
//! * growth jumps to the next power of two that fits the requested length;
//! * after a removal, if fewer than 25% of the slots are live the storage
//!   shrinks to a quarter of its size, never below [`MIN_CAPACITY`].
//!
//! Columns are byte offsets. A column equal to [`Line::len`] is the
//! end-of-line insertion point and is valid for inserts but not for reads.
//!
//! Out-of-range columns are caller bugs and panic.

use std::fmt;
use tracing::trace;

/// Smallest capacity a line ever holds.
pub const MIN_CAPACITY: usize = 8;

/// Colored region start marker. Derived data: carried across clone/move but
/// never interpreted by the editing primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub pair: u16,
}

/// A single row of text stored as raw bytes.
#[derive(Clone)]
pub struct Line {
    // slots.len() is the logical capacity; bytes past `len` are zeroed.
    slots: Vec<u8>,
    len: usize,
    spans: Vec<HighlightSpan>,
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Line {
    /// Create an empty line with the minimum capacity.
    pub fn new() -> Self {
        Self {
            slots: vec![0; MIN_CAPACITY],
            len: 0,
            spans: Vec::new(),
        }
    }

    /// Create a line holding exactly `bytes` (no newline trimming).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut line = Self::new();
        line.splice(0, bytes);
        line
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Logical capacity (number of allocated slots).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.slots[..self.len]
    }

    /// Byte at `at`, or `None` when `at >= len`.
    pub fn byte_at(&self, at: usize) -> Option<u8> {
        self.as_bytes().get(at).copied()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    pub fn highlight_spans(&self) -> &[HighlightSpan] {
        &self.spans
    }

    pub fn set_highlight_spans(&mut self, spans: Vec<HighlightSpan>) {
        self.spans = spans;
    }

    /// Insert `ch` at column `at`, shifting `[at, len)` one slot right.
    pub fn insert_char(&mut self, at: usize, ch: u8) {
        self.check_column(at);
        self.open_gap(at, 1);
        self.slots[at] = ch;
    }

    /// Remove the byte *before* column `at` (backspace semantics).
    ///
    /// Column 0 has nothing before it: returns `None` and leaves the line as is.
    pub fn delete_char(&mut self, at: usize) -> Option<u8> {
        if at == 0 {
            return None;
        }
        self.check_column(at);
        let removed = self.slots[at - 1];
        self.close_gap(at - 1, 1);
        Some(removed)
    }

    /// Overwrite the byte at `at` and return the previous one.
    ///
    /// At end of line this is an insert and returns `None`.
    pub fn replace_char(&mut self, at: usize, ch: u8) -> Option<u8> {
        self.check_column(at);
        if at == self.len {
            self.insert_char(at, ch);
            return None;
        }
        Some(std::mem::replace(&mut self.slots[at], ch))
    }

    /// Bulk insert at `at`. One trailing line feed is dropped.
    pub fn insert_str(&mut self, at: usize, bytes: &[u8]) {
        self.check_column(at);
        let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        self.splice(at, bytes);
    }

    /// Append raw bytes at end of line.
    pub fn append(&mut self, bytes: &[u8]) {
        self.splice(self.len, bytes);
    }

    /// Copy `len` bytes starting at `at` (to end of line when `len` is `None`).
    pub fn copy_range(&self, at: usize, len: Option<usize>) -> Vec<u8> {
        let end = self.range_end(at, len);
        self.slots[at..end].to_vec()
    }

    /// Copy `len` bytes from `at` and, when `remove` is set, cut them out of the
    /// line (kill / line-split semantics).
    pub fn extract_range(&mut self, at: usize, len: Option<usize>, remove: bool) -> Vec<u8> {
        let end = self.range_end(at, len);
        let out = self.slots[at..end].to_vec();
        if remove && end > at {
            self.close_gap(at, end - at);
        }
        out
    }

    fn range_end(&self, at: usize, len: Option<usize>) -> usize {
        self.check_column(at);
        let end = at + len.unwrap_or(self.len - at);
        assert!(
            end <= self.len,
            "range {at}..{end} exceeds line length {}",
            self.len
        );
        end
    }

    fn splice(&mut self, at: usize, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.open_gap(at, bytes.len());
        self.slots[at..at + bytes.len()].copy_from_slice(bytes);
    }

    fn check_column(&self, at: usize) {
        assert!(
            at <= self.len,
            "column {at} out of bounds for line of length {}",
            self.len
        );
    }

    /// Shift `[at, len)` right by `by` slots, growing first when needed.
    fn open_gap(&mut self, at: usize, by: usize) {
        let needed = self.len + by;
        if needed > self.capacity() {
            self.resize_storage(grown_capacity(needed));
        }
        self.slots.copy_within(at..self.len, at + by);
        self.len = needed;
    }

    /// Shift `[at + by, len)` left onto `at`, then apply the shrink policy.
    fn close_gap(&mut self, at: usize, by: usize) {
        self.slots.copy_within(at + by..self.len, at);
        self.slots[self.len - by..self.len].fill(0);
        self.len -= by;
        let capacity = self.capacity();
        if self.len < capacity / 4 {
            let target = (capacity / 4).max(MIN_CAPACITY);
            if target < capacity {
                self.resize_storage(target);
            }
        }
    }

    fn resize_storage(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len);
        let from = self.capacity();
        self.slots.resize(capacity, 0);
        if capacity < from {
            self.slots.shrink_to_fit();
        }
        trace!(target: "text.line", from, to = capacity, len = self.len, "resize");
    }
}

/// Next power of two that fits `needed`, never below [`MIN_CAPACITY`].
fn grown_capacity(needed: usize) -> usize {
    needed.next_power_of_two().max(MIN_CAPACITY)
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes() && self.spans == other.spans
    }
}

impl Eq for Line {}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line")
            .field("text", &self.to_string_lossy())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
