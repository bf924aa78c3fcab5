//! Cursor and viewport model.
//!
//! A [`View`] maps the cursor's buffer coordinates (line, byte column) to
//! terminal coordinates and decides when the visible window must scroll.
//! [`EditorModel`] pairs one `View` with the [`EditorState`] it looks at.
//!
//! Invariants (hold after every public call that takes the document):
//! * `cursor.line < document.line_count()`
//! * `cursor.col <= len(cursor.line)` (end of line is a valid position)
//! * `gutter_width == digits(line_count) + 1`
//! * `screen_col == cursor.col + gutter_width`
//! * `screen_row == cursor.line - scroll_line`, and the cursor row is inside
//!   the text area whenever the text area has at least one row.
//!
//! There is no horizontal scrolling: a column past the terminal width yields a
//! `screen_col` past the right edge and the renderer clips.

use core_state::EditorState;
use core_text::{Document, Position};
use tracing::trace;

/// Rows below the text area: status line, command line and a spacer.
pub const DEFAULT_RESERVED_ROWS: usize = 3;

/// Compute the desired new first visible line to keep the cursor within the
/// vertical viewport subject to a top/bottom margin.
///
/// Inputs:
/// - first: current first visible line (top of viewport)
/// - cursor_line: current cursor line (0-based)
/// - text_height: number of text rows available (excludes status rows)
/// - margin: desired margin in rows (clamped to at most text_height/2)
///
/// Returns `Some(new_first)` if a scroll is needed, else `None` when the cursor
/// is already within the permitted band. With a zero margin a cursor below the
/// window lands on the last row and a cursor above it lands on the first row.
pub fn compute_scroll_intent(
    first: usize,
    cursor_line: usize,
    text_height: usize,
    margin: usize,
) -> Option<usize> {
    if text_height == 0 {
        return None;
    }
    let m = margin.min(text_height / 2);
    let top = first;
    let bottom = first + text_height;
    if cursor_line < top + m {
        let new_first = cursor_line.saturating_sub(m);
        if new_first != first {
            return Some(new_first);
        }
    } else if cursor_line + m >= bottom {
        let new_first = cursor_line + m + 1 - text_height;
        if new_first != first {
            return Some(new_first);
        }
    }
    None
}

/// Width of the line-number gutter for a document of `line_count` lines:
/// one column per decimal digit plus a separator.
pub fn gutter_width_for(line_count: usize) -> usize {
    let mut digits = 1;
    let mut n = line_count / 10;
    while n != 0 {
        digits += 1;
        n /= 10;
    }
    digits + 1
}

/// Outcome of a cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    /// Already at the boundary; nothing changed.
    Blocked,
    /// Cursor moved inside the visible window.
    Moved,
    /// The window scrolled; the whole text area needs repainting.
    Scrolled { old_first: usize, new_first: usize },
}

impl CursorMove {
    pub fn moved(self) -> bool {
        !matches!(self, CursorMove::Blocked)
    }

    pub fn scrolled(self) -> bool {
        matches!(self, CursorMove::Scrolled { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    cursor: Position,
    screen_row: usize,
    screen_col: usize,
    scroll_line: usize,
    gutter_width: usize,
    rows: usize,
    cols: usize,
    reserved_rows: usize,
    text_rows: usize,
    vertical_margin: usize,
}

impl View {
    /// View over a `rows` x `cols` terminal, cursor at the origin.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut view = Self {
            cursor: Position::origin(),
            screen_row: 0,
            screen_col: 0,
            scroll_line: 0,
            gutter_width: gutter_width_for(1),
            rows,
            cols,
            reserved_rows: DEFAULT_RESERVED_ROWS,
            text_rows: 0,
            vertical_margin: 0,
        };
        view.text_rows = view.rows.saturating_sub(view.reserved_rows);
        view.screen_col = view.gutter_width;
        view
    }

    pub fn with_reserved_rows(mut self, reserved_rows: usize) -> Self {
        self.reserved_rows = reserved_rows;
        self.text_rows = self.rows.saturating_sub(reserved_rows);
        self
    }

    /// Scroll margin in rows, already clamped to the text area by the caller
    /// (see `core_config::Config::apply_text_rows`).
    pub fn with_vertical_margin(mut self, margin: usize) -> Self {
        self.vertical_margin = margin;
        self
    }

    /// Adopt a new margin (after a resize re-clamped it). Returns true if the
    /// window scrolled to honor it.
    pub fn set_vertical_margin(&mut self, doc: &Document, margin: usize) -> bool {
        self.vertical_margin = margin;
        trace!(target: "model.view", margin, "vertical_margin");
        self.sync(doc)
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn screen_row(&self) -> usize {
        self.screen_row
    }

    pub fn screen_col(&self) -> usize {
        self.screen_col
    }

    /// First visible document line.
    pub fn scroll_line(&self) -> usize {
        self.scroll_line
    }

    pub fn gutter_width(&self) -> usize {
        self.gutter_width
    }

    pub fn text_rows(&self) -> usize {
        self.text_rows
    }

    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn vertical_margin(&self) -> usize {
        self.vertical_margin
    }

    /// Visible document line range `[first, end)`.
    pub fn visible_lines(&self, doc: &Document) -> std::ops::Range<usize> {
        let end = (self.scroll_line + self.text_rows).min(doc.line_count());
        self.scroll_line.min(end)..end
    }

    // -- Motions ------------------------------------------------------------

    pub fn move_left(&mut self, doc: &Document) -> CursorMove {
        if self.cursor.col == 0 {
            return CursorMove::Blocked;
        }
        let to = Position::new(self.cursor.line, self.cursor.col - 1);
        self.place(doc, to)
    }

    pub fn move_right(&mut self, doc: &Document) -> CursorMove {
        if self.cursor.col >= line_len(doc, self.cursor.line) {
            return CursorMove::Blocked;
        }
        let to = Position::new(self.cursor.line, self.cursor.col + 1);
        self.place(doc, to)
    }

    /// Column clamps to the new line's length.
    pub fn move_up(&mut self, doc: &Document) -> CursorMove {
        if self.cursor.line == 0 {
            return CursorMove::Blocked;
        }
        let to = Position::new(self.cursor.line - 1, self.cursor.col);
        self.place(doc, to)
    }

    pub fn move_down(&mut self, doc: &Document) -> CursorMove {
        if self.cursor.line + 1 >= doc.line_count() {
            return CursorMove::Blocked;
        }
        let to = Position::new(self.cursor.line + 1, self.cursor.col);
        self.place(doc, to)
    }

    /// Jump to line `idx` (clamped to the last line). Scrolls only when the
    /// target leaves the visible window.
    pub fn goto_line(&mut self, doc: &Document, idx: usize) -> CursorMove {
        let idx = idx.min(doc.line_count().saturating_sub(1));
        if idx == self.cursor.line {
            return CursorMove::Blocked;
        }
        let to = Position::new(idx, self.cursor.col);
        let change = self.place(doc, to);
        trace!(target: "model.view", line = idx, scrolled = change.scrolled(), "goto_line");
        change
    }

    pub fn move_to_col(&mut self, doc: &Document, col: usize) -> CursorMove {
        let to = Position::new(self.cursor.line, col);
        self.place(doc, to)
    }

    pub fn line_start(&mut self, doc: &Document) -> CursorMove {
        self.move_to_col(doc, 0)
    }

    pub fn line_end(&mut self, doc: &Document) -> CursorMove {
        self.move_to_col(doc, line_len(doc, self.cursor.line))
    }

    /// First line, column 0.
    pub fn file_start(&mut self, doc: &Document) -> CursorMove {
        self.place(doc, Position::origin())
    }

    /// Last line, column 0.
    pub fn file_end(&mut self, doc: &Document) -> CursorMove {
        let last = doc.line_count().saturating_sub(1);
        self.place(doc, Position::new(last, 0))
    }

    /// Put the cursor at `to` (clamped) and scroll if needed. Used after an
    /// edit or undo reports where the caret lands.
    pub fn set_cursor(&mut self, doc: &Document, to: Position) -> CursorMove {
        self.place(doc, to)
    }

    // -- Geometry -----------------------------------------------------------

    /// Recompute the gutter from the line count. Returns true if it changed.
    pub fn recompute_gutter(&mut self, doc: &Document) -> bool {
        let width = gutter_width_for(doc.line_count());
        if width == self.gutter_width {
            return false;
        }
        trace!(target: "model.view", from = self.gutter_width, to = width, "gutter_resize");
        self.gutter_width = width;
        self.screen_col = self.cursor.col + width;
        true
    }

    /// Terminal resize. Returns true if the window scrolled.
    pub fn resize(&mut self, doc: &Document, rows: usize, cols: usize) -> bool {
        self.rows = rows;
        self.cols = cols;
        self.text_rows = rows.saturating_sub(self.reserved_rows);
        trace!(target: "model.view", rows, cols, text_rows = self.text_rows, "resize");
        self.sync(doc)
    }

    /// Re-establish every invariant against the current document. Returns
    /// true if the window scrolled.
    pub fn sync(&mut self, doc: &Document) -> bool {
        let to = self.cursor;
        match self.place(doc, to) {
            CursorMove::Scrolled { .. } => true,
            CursorMove::Moved | CursorMove::Blocked => false,
        }
    }

    fn place(&mut self, doc: &Document, mut to: Position) -> CursorMove {
        to.clamp_to_document(doc);
        self.recompute_gutter(doc);
        let old_first = self.scroll_line;
        if self.scroll_line >= doc.line_count() {
            self.scroll_line = to.line;
        }
        if let Some(new_first) = compute_scroll_intent(
            self.scroll_line,
            to.line,
            self.text_rows,
            self.vertical_margin,
        ) {
            self.scroll_line = new_first;
        }
        let moved = to != self.cursor;
        self.cursor = to;
        self.screen_row = to.line.saturating_sub(self.scroll_line);
        self.screen_col = to.col + self.gutter_width;
        if self.scroll_line != old_first {
            CursorMove::Scrolled {
                old_first,
                new_first: self.scroll_line,
            }
        } else if moved {
            CursorMove::Moved
        } else {
            CursorMove::Blocked
        }
    }
}

fn line_len(doc: &Document, line: usize) -> usize {
    doc.line_len(line).unwrap_or(0)
}

/// One editing session together with the view onto it.
#[derive(Debug)]
pub struct EditorModel {
    state: EditorState,
    view: View,
}

impl EditorModel {
    pub fn new(state: EditorState, mut view: View) -> Self {
        view.sync(state.document());
        Self { state, view }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn cursor(&self) -> Position {
        self.view.cursor()
    }

    /// Disjoint mutable borrows of the state and the view.
    pub fn split_state_and_view(&mut self) -> (&mut EditorState, &mut View) {
        (&mut self.state, &mut self.view)
    }

    /// Re-derive the view after the document changed underneath it.
    pub fn sync_view(&mut self) -> bool {
        self.view.sync(self.state.document())
    }
}
