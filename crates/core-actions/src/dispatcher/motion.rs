//! Cursor motions. No history is touched.

use core_events::MotionKind;
use core_model::{CursorMove, View};
use core_state::EditorState;

use super::DispatchResult;

pub(crate) fn handle_motion(kind: MotionKind, state: &EditorState, view: &mut View) -> DispatchResult {
    let doc = state.document();
    let before = view.cursor();
    let change = match kind {
        MotionKind::Left => view.move_left(doc),
        MotionKind::Right => view.move_right(doc),
        MotionKind::Up => view.move_up(doc),
        MotionKind::Down => view.move_down(doc),
        MotionKind::LineStart => view.line_start(doc),
        MotionKind::LineEnd => view.line_end(doc),
        MotionKind::FileStart => view.file_start(doc),
        MotionKind::FileEnd => view.file_end(doc),
    };
    tracing::trace!(target: "actions.dispatch", op = "motion", ?kind, line = before.line, col = before.col, to_line = view.cursor().line, to_col = view.cursor().col, "motion");
    result_for(change)
}

pub(crate) fn handle_goto(line: usize, state: &EditorState, view: &mut View) -> DispatchResult {
    result_for(view.goto_line(state.document(), line))
}

fn result_for(change: CursorMove) -> DispatchResult {
    match change {
        CursorMove::Blocked => DispatchResult::clean(),
        CursorMove::Moved | CursorMove::Scrolled { .. } => DispatchResult::dirty(),
    }
}
