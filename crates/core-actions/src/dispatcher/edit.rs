//! Text edits at the cursor, each recorded as one undo entry.
//!
//! The edit is translated into a [`Command`], its inverse is computed against
//! the untouched document, the command runs, and the inverse goes onto the
//! undo stack. Edits that would change nothing (backspace at the very start of
//! the document, join on the first line) record nothing. A line feed typed in
//! insert or replace is a line break, never a byte inside a line. Joins only
//! happen from column 0 so undo can put the caret back exactly.

use core_events::EditKind;
use core_model::EditorModel;
use core_state::Command;
use core_text::{Document, Line, Position};

use super::CursorDelta;

/// Apply `op` at the cursor and record its inverse. `None` means the edit was a
/// no-op and the history is unchanged.
pub fn apply_and_record(model: &mut EditorModel, op: EditKind) -> Option<CursorDelta> {
    let (state, view) = model.split_state_and_view();
    let from = view.cursor();
    let cmd = command_for(op, from, state.document())?;

    let (doc, history) = state.document_and_history_mut();
    let inverse = cmd.invert(doc);
    let mut landed = cmd.apply(doc);
    if matches!(cmd, Command::ReplaceChar { .. }) {
        // Overtype advances past the replaced byte.
        landed.col = from.col + 1;
    }
    history.record(inverse);

    let change = view.set_cursor(doc, landed);
    let to = view.cursor();
    tracing::trace!(target: "actions.dispatch", op = cmd.name(), line = from.line, col = from.col, to_line = to.line, to_col = to.col, "edit");
    Some(CursorDelta {
        from,
        to,
        scrolled: change.scrolled(),
    })
}

fn command_for(op: EditKind, at: Position, doc: &Document) -> Option<Command> {
    let Position { line, col } = at;
    match op {
        EditKind::Newline | EditKind::Insert(b'\n') | EditKind::Replace(b'\n') => {
            Some(Command::SplitLine { line, col })
        }
        EditKind::Insert(ch) => Some(Command::InsertChar { line, col, ch }),
        EditKind::Replace(ch) => Some(Command::ReplaceChar { line, col, ch }),
        EditKind::Backspace if col > 0 => {
            let ch = doc.get_line(line)?.byte_at(col - 1)?;
            Some(Command::DeleteChar { line, col, ch })
        }
        EditKind::JoinLine if col > 0 => {
            tracing::debug!(target: "actions.dispatch", line, col, "join_ignored_off_line_start");
            None
        }
        EditKind::Backspace | EditKind::JoinLine => join_onto_previous(line, doc),
    }
}

fn join_onto_previous(line: usize, doc: &Document) -> Option<Command> {
    if line == 0 {
        return None;
    }
    let col = doc.line_len(line - 1)?;
    let content = Line::from_bytes(doc.get_line(line)?.as_bytes());
    Some(Command::JoinLines { line, col, content })
}
