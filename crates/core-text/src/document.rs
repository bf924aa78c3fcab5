//! Ordered line storage for one open file.
//!
//! A `Document` is never empty: every constructor and every mutation leaves at
//! least one (possibly empty) `Line`. All mutating operations set the dirty
//! flag; only a successful [`Document::save`] clears it.
//!
//! Line indices past the end are caller bugs and panic. Use
//! [`Document::get_line`] when an index is not known to be valid.
//!
//! On-disk format: every line is written followed by `\n`. Loading treats each
//! `\n` as a line terminator; a final unterminated segment is also a line. The
//! two are inverse, so `save` then `load` preserves every line including empty
//! trailing ones.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

use crate::line::Line;

/// Read size used when loading from disk.
pub const CHUNK_SIZE: usize = 8192;

/// Initial slot count of the line array. Doubles when full, never shrinks.
pub const INITIAL_LINE_CAPACITY: usize = 4;

const UNNAMED_DISPLAY: &str = "(unnamed)";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("file has no name")]
    Unnamed,
}

#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<Line>,
    capacity: usize,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Unnamed, clean document holding one empty line.
    pub fn new() -> Self {
        let mut doc = Self::without_lines();
        doc.lines.push(Line::new());
        doc
    }

    /// Build a clean, unnamed document from in-memory lines.
    pub fn from_lines<I, B>(lines: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut doc = Self::without_lines();
        for bytes in lines {
            let at = doc.lines.len();
            doc.insert_line(at, Line::from_bytes(bytes.as_ref()));
        }
        if doc.lines.is_empty() {
            doc.lines.push(Line::new());
        }
        doc.dirty = false;
        doc
    }

    // Transient state used while loading; callers restore the non-empty invariant.
    fn without_lines() -> Self {
        Self {
            lines: Vec::with_capacity(INITIAL_LINE_CAPACITY),
            capacity: INITIAL_LINE_CAPACITY,
            path: None,
            dirty: false,
        }
    }

    /// Load `path`, or start a new document when `path` is `None` or missing.
    ///
    /// A missing file still names the document so a later `save` writes there.
    pub fn load(path: Option<&Path>) -> Result<Self, DocumentError> {
        let Some(path) = path else {
            return Ok(Self::new());
        };
        let mut doc = match File::open(path) {
            Ok(file) => {
                Self::load_from_reader(file, CHUNK_SIZE).map_err(|source| DocumentError::Io {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(target: "text.document", path = %path.display(), "new_file");
                Self::new()
            }
            Err(source) => {
                return Err(DocumentError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Read line-delimited content from `reader` in `chunk_size` pieces.
    ///
    /// A line that straddles a chunk boundary is carried over and completed by
    /// the next read before it is committed.
    pub fn load_from_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<Self> {
        let mut doc = Self::without_lines();
        let mut chunk = vec![0u8; chunk_size.max(1)];
        let mut pending = Line::new();
        let mut chunks = 0usize;
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            chunks += 1;
            let mut rest = &chunk[..n];
            while let Some(nl) = rest.iter().position(|&b| b == b'\n') {
                pending.append(&rest[..nl]);
                let at = doc.lines.len();
                doc.insert_line(at, std::mem::take(&mut pending));
                rest = &rest[nl + 1..];
            }
            pending.append(rest);
        }
        if !pending.is_empty() || doc.lines.is_empty() {
            let at = doc.lines.len();
            doc.insert_line(at, pending);
        }
        doc.dirty = false;
        trace!(target: "text.document", chunks, lines = doc.lines.len(), "load_from_reader");
        Ok(doc)
    }

    /// Write every line followed by `\n`.
    ///
    /// `None` reuses the document's name. On success the dirty flag clears and
    /// the target becomes the document's name; on failure nothing changes.
    pub fn save(&mut self, target: Option<&Path>) -> Result<(), DocumentError> {
        let path = match target {
            Some(p) => p.to_path_buf(),
            None => self.path.clone().ok_or(DocumentError::Unnamed)?,
        };
        if let Err(source) = self.write_file(&path) {
            return Err(DocumentError::Io { path, source });
        }
        self.path = Some(path);
        self.dirty = false;
        Ok(())
    }

    fn write_file(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_lines(&mut out)?;
        out.flush()
    }

    pub fn write_lines<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in &self.lines {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    // -- Metadata -----------------------------------------------------------

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_unnamed(&self) -> bool {
        self.path.is_none()
    }

    /// Name suitable for the status line.
    pub fn display_name(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => UNNAMED_DISPLAY.to_string(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // -- Line access --------------------------------------------------------

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Logical slot count of the line array.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn get_line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    pub fn line_len(&self, idx: usize) -> Option<usize> {
        self.lines.get(idx).map(Line::len)
    }

    /// Lossy UTF-8 copy of every line (diagnostics and tests).
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::to_string_lossy).collect()
    }

    fn line_mut(&mut self, idx: usize) -> &mut Line {
        let count = self.lines.len();
        assert!(
            idx < count,
            "line index {idx} out of bounds (document has {count} lines)"
        );
        self.dirty = true;
        &mut self.lines[idx]
    }

    // -- Character edits ----------------------------------------------------

    pub fn insert_char(&mut self, line: usize, col: usize, ch: u8) {
        self.line_mut(line).insert_char(col, ch);
    }

    /// Backspace at `(line, col)`. Column 0 is a no-op returning `None`.
    pub fn delete_char(&mut self, line: usize, col: usize) -> Option<u8> {
        self.line_mut(line).delete_char(col)
    }

    pub fn replace_char(&mut self, line: usize, col: usize, ch: u8) -> Option<u8> {
        self.line_mut(line).replace_char(col, ch)
    }

    // -- Line structure -----------------------------------------------------

    /// Split `line` at `col`.
    ///
    /// * `col == 0`: an empty line is inserted before, the text moves down.
    /// * `col == len`: an empty line is inserted after.
    /// * otherwise `[col, len)` moves into a new line at `line + 1`.
    pub fn break_line(&mut self, line: usize, col: usize) {
        let len = self.line_mut(line).len();
        assert!(col <= len, "column {col} beyond end of line {line} ({len})");
        trace!(target: "text.document", line, col, len, "break_line");
        if col == 0 {
            self.insert_line(line, Line::new());
        } else if col == len {
            self.insert_line(line + 1, Line::new());
        } else {
            let tail = self.lines[line].extract_range(col, None, true);
            self.insert_line(line + 1, Line::from_bytes(&tail));
        }
    }

    /// Place `line` at `idx`, shifting later lines down. `idx == line_count()`
    /// appends.
    pub fn insert_line(&mut self, idx: usize, line: Line) {
        let count = self.lines.len();
        assert!(
            idx <= count,
            "insert index {idx} out of bounds (document has {count} lines)"
        );
        if count == self.capacity {
            self.capacity = (self.capacity * 2).max(INITIAL_LINE_CAPACITY);
            self.lines.reserve_exact(self.capacity - count);
            trace!(target: "text.document", capacity = self.capacity, "grow_lines");
        }
        self.lines.insert(idx, line);
        self.dirty = true;
    }

    /// Insert a new line built from `bytes` (one trailing newline dropped).
    pub fn insert_text_line(&mut self, idx: usize, bytes: &[u8]) {
        let mut line = Line::new();
        line.insert_str(0, bytes);
        self.insert_line(idx, line);
    }

    /// Remove and return line `idx`. Removing the last remaining line leaves a
    /// single empty line behind.
    pub fn delete_line(&mut self, idx: usize) -> Line {
        self.line_mut(idx);
        let removed = self.lines.remove(idx);
        if self.lines.is_empty() {
            self.lines.push(Line::new());
        }
        removed
    }

    /// Join line `idx` onto its predecessor (backspace at column 0).
    ///
    /// Returns the column where the caret lands: the predecessor's original
    /// length. An empty predecessor is discarded instead, so line `idx` moves
    /// up unchanged and the caret lands at 0. `idx == 0` is a no-op.
    pub fn move_line_up(&mut self, idx: usize) -> usize {
        if idx == 0 {
            return 0;
        }
        self.line_mut(idx);
        let prev_len = self.lines[idx - 1].len();
        if prev_len > 0 {
            let line = self.lines.remove(idx);
            self.lines[idx - 1].append(line.as_bytes());
        } else {
            self.lines.remove(idx - 1);
        }
        trace!(target: "text.document", idx, join_col = prev_len, "move_line_up");
        prev_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|l| l.as_bytes()))
    }

    #[test]
    fn new_document_has_one_empty_line() {
        let d = Document::new();
        assert_eq!(d.line_count(), 1);
        assert_eq!(d.line_len(0), Some(0));
        assert!(!d.is_dirty());
        assert!(d.is_unnamed());
        assert_eq!(d.display_name(), "(unnamed)");
    }

    #[test]
    fn char_edits_mark_dirty() {
        let mut d = doc(&["abc"]);
        assert!(!d.is_dirty());
        d.insert_char(0, 3, b'd');
        assert!(d.is_dirty());
        assert_eq!(d.text_lines(), vec!["abcd"]);
        assert_eq!(d.replace_char(0, 0, b'A'), Some(b'a'));
        assert_eq!(d.delete_char(0, 4), Some(b'd'));
        assert_eq!(d.text_lines(), vec!["Abc"]);
    }

    #[test]
    fn delete_at_column_zero_keeps_content() {
        let mut d = Document::new();
        assert_eq!(d.delete_char(0, 0), None);
        assert_eq!(d.text_lines(), vec![""]);
    }

    #[test]
    fn break_line_interior_start_and_end() {
        let mut d = doc(&["abcd"]);
        d.break_line(0, 2);
        assert_eq!(d.text_lines(), vec!["ab", "cd"]);

        let mut d = doc(&["abcd"]);
        d.break_line(0, 0);
        assert_eq!(d.text_lines(), vec!["", "abcd"]);

        let mut d = doc(&["abcd"]);
        d.break_line(0, 4);
        assert_eq!(d.text_lines(), vec!["abcd", ""]);
    }

    #[test]
    fn move_line_up_appends_into_nonempty_predecessor() {
        let mut d = doc(&["ab", "cd", "ef"]);
        assert_eq!(d.move_line_up(1), 2);
        assert_eq!(d.text_lines(), vec!["abcd", "ef"]);
    }

    #[test]
    fn move_line_up_discards_empty_predecessor() {
        let mut d = doc(&["", "x"]);
        assert_eq!(d.move_line_up(1), 0);
        assert_eq!(d.text_lines(), vec!["x"]);
    }

    #[test]
    fn move_line_up_on_first_line_is_noop() {
        let mut d = doc(&["a", "b"]);
        assert_eq!(d.move_line_up(0), 0);
        assert_eq!(d.text_lines(), vec!["a", "b"]);
        assert!(!d.is_dirty());
    }

    #[test]
    fn break_then_join_round_trips() {
        for col in 0..=4 {
            let mut d = doc(&["abcd"]);
            d.break_line(0, col);
            let join_col = d.move_line_up(1);
            assert_eq!(d.text_lines(), vec!["abcd"], "col {col}");
            assert_eq!(join_col, col);
        }
    }

    #[test]
    fn line_array_capacity_doubles() {
        let mut d = Document::new();
        assert_eq!(d.capacity(), INITIAL_LINE_CAPACITY);
        for i in 0..4 {
            d.insert_line(i, Line::new());
        }
        assert_eq!(d.line_count(), 5);
        assert_eq!(d.capacity(), 8);
        for _ in 0..4 {
            d.delete_line(0);
        }
        assert_eq!(d.capacity(), 8, "line array never shrinks");
    }

    #[test]
    fn deleting_only_line_leaves_empty_line() {
        let mut d = doc(&["solo"]);
        let removed = d.delete_line(0);
        assert_eq!(removed.as_bytes(), b"solo");
        assert_eq!(d.text_lines(), vec![""]);
    }

    #[test]
    fn insert_text_line_trims_newline() {
        let mut d = doc(&["a"]);
        d.insert_text_line(1, b"b\n");
        assert_eq!(d.text_lines(), vec!["a", "b"]);
    }

    #[test]
    fn reader_reassembles_lines_across_chunks() {
        let input = b"first line\nsecond\n\nlast without newline";
        for chunk in [1, 2, 3, 7, 64] {
            let d = Document::load_from_reader(&input[..], chunk).unwrap();
            assert_eq!(
                d.text_lines(),
                vec!["first line", "second", "", "last without newline"],
                "chunk size {chunk}"
            );
            assert!(!d.is_dirty());
        }
    }

    #[test]
    fn reader_empty_input_yields_single_empty_line() {
        let d = Document::load_from_reader(&b""[..], 4).unwrap();
        assert_eq!(d.text_lines(), vec![""]);
    }

    #[test]
    fn reader_keeps_trailing_empty_lines() {
        let d = Document::load_from_reader(&b"a\n\n\n"[..], 2).unwrap();
        assert_eq!(d.text_lines(), vec!["a", "", ""]);
    }

    #[test]
    fn load_missing_file_is_named_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        let d = Document::load(Some(&path)).unwrap();
        assert_eq!(d.text_lines(), vec![""]);
        assert_eq!(d.path(), Some(path.as_path()));
        assert!(!d.is_dirty());
    }

    #[test]
    fn load_none_is_unnamed() {
        let d = Document::load(None).unwrap();
        assert!(d.is_unnamed());
        assert_eq!(d.line_count(), 1);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut d = doc(&["alpha", "", "gamma", "", ""]);
        d.mark_dirty();
        d.save(Some(&path)).unwrap();
        assert!(!d.is_dirty());
        assert_eq!(d.path(), Some(path.as_path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"alpha\n\ngamma\n\n\n");
        let back = Document::load(Some(&path)).unwrap();
        assert_eq!(back.text_lines(), d.text_lines());
    }

    #[test]
    fn save_unnamed_without_target_fails() {
        let mut d = Document::new();
        d.insert_char(0, 0, b'x');
        let err = d.save(None).unwrap_err();
        assert!(matches!(err, DocumentError::Unnamed));
        assert!(d.is_dirty());
    }

    #[test]
    fn failed_save_leaves_document_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing-dir").join("f.txt");
        let mut d = doc(&["keep"]);
        d.insert_char(0, 4, b'!');
        let err = d.save(Some(&target)).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
        assert!(d.is_dirty());
        assert!(d.is_unnamed());
        assert_eq!(d.text_lines(), vec!["keep!"]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn mutating_past_last_line_panics() {
        let mut d = Document::new();
        d.insert_char(1, 0, b'x');
    }
}
