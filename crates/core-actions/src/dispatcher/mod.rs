//! Dispatcher applying `Event`s to the editor model.
//!
//! Sub-modules:
//! * `edit`   - text mutation at the cursor, recorded for undo
//! * `undo`   - undo / redo against the recorded history
//! * `motion` - cursor movement semantics
//! * `mode`   - mode transitions
//!
//! File load/save lives in [`crate::io_ops`]; this module only routes to it
//! and swaps the loaded document into the session.

use std::path::Path;

use core_events::Event;
use core_model::EditorModel;
use core_state::Mode;
use core_text::Position;

mod edit;
mod mode;
mod motion;
mod undo;

pub use edit::apply_and_record;
pub use undo::{redo, undo};

use crate::io_ops;

/// Result of dispatching a single `Event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// The document was replaced or changed shape enough that any per-line
    /// render caches must be treated as invalid.
    pub buffer_replaced: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            buffer_replaced: false,
        }
    }
    pub fn buffer_replaced() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: true,
        }
    }
}

/// Cursor movement caused by one recorded edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorDelta {
    pub from: Position,
    pub to: Position,
    pub scrolled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    Applied,
    NothingToUndo,
    NothingToRedo,
}

/// Apply an event to the model. Returns `DispatchResult` describing whether a
/// render is needed (`dirty`) or the editor should exit (`quit`).
pub fn dispatch(event: Event, model: &mut EditorModel) -> DispatchResult {
    match event {
        Event::Edit(kind) => {
            if matches!(model.state().mode, Mode::Visual | Mode::CommandLine) {
                tracing::debug!(target: "actions.dispatch", mode = ?model.state().mode, "edit_ignored_in_mode");
                return DispatchResult::clean();
            }
            let lines_before = model.state().document().line_count();
            match apply_and_record(model, kind) {
                Some(delta) => shape_result(model, lines_before, delta.scrolled),
                None => DispatchResult::clean(),
            }
        }
        Event::Undo | Event::Redo => {
            let lines_before = model.state().document().line_count();
            let status = if event == Event::Undo {
                undo(model)
            } else {
                redo(model)
            };
            match status {
                HistoryStatus::Applied => shape_result(model, lines_before, false),
                // Status line changed.
                HistoryStatus::NothingToUndo | HistoryStatus::NothingToRedo => {
                    DispatchResult::dirty()
                }
            }
        }
        Event::Motion(kind) => {
            let (state, view) = model.split_state_and_view();
            motion::handle_motion(kind, state, view)
        }
        Event::Goto(line) => {
            let (state, view) = model.split_state_and_view();
            motion::handle_goto(line, state, view)
        }
        Event::EnterMode(req) => mode::handle_enter(req, model.state_mut()),
        Event::Escape => mode::handle_escape(model.state_mut()),
        Event::Resize { rows, cols } => {
            let (state, view) = model.split_state_and_view();
            view.resize(state.document(), rows.into(), cols.into());
            DispatchResult::buffer_replaced()
        }
        Event::Save(path) => {
            // Outcome is reported on the status line.
            let _ = io_ops::save_document(model.state_mut(), path.as_deref());
            DispatchResult::dirty()
        }
        Event::Load(path) => load(model, path.as_deref()),
        Event::Quit => DispatchResult::quit(),
    }
}

fn shape_result(model: &EditorModel, lines_before: usize, scrolled: bool) -> DispatchResult {
    if scrolled || model.state().document().line_count() != lines_before {
        DispatchResult::buffer_replaced()
    } else {
        DispatchResult::dirty()
    }
}

/// Replace the session's document with `path` (or reload the current file).
fn load(model: &mut EditorModel, path: Option<&Path>) -> DispatchResult {
    let current = model.state().document().path().map(Path::to_path_buf);
    let Some(target) = path.or(current.as_deref()) else {
        model.state_mut().set_status("file has no name");
        return DispatchResult::dirty();
    };
    let outcome = io_ops::open_document(Some(target));
    let (state, view) = model.split_state_and_view();
    state.replace_document(outcome.document);
    if let Some(status) = outcome.status {
        state.set_status(status);
    }
    view.set_cursor(state.document(), Position::origin());
    DispatchResult::buffer_replaced()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{EditKind, ModeRequest, MotionKind};
    use core_model::View;
    use core_state::EditorState;
    use core_text::Document;

    fn model(lines: &[&str]) -> EditorModel {
        let doc = Document::from_lines(lines.iter().map(|l| l.as_bytes()));
        EditorModel::new(EditorState::new(doc), View::new(24, 80))
    }

    #[test]
    fn quit_event_sets_quit() {
        let mut m = model(&["x"]);
        assert!(dispatch(Event::Quit, &mut m).quit);
    }

    #[test]
    fn newline_marks_buffer_replaced() {
        let mut m = model(&["ab"]);
        let r = dispatch(Event::Edit(EditKind::Newline), &mut m);
        assert!(r.buffer_replaced);
        let r = dispatch(Event::Edit(EditKind::Insert(b'x')), &mut m);
        assert_eq!(r, DispatchResult::dirty());
    }

    #[test]
    fn edits_ignored_in_visual_mode() {
        let mut m = model(&["ab"]);
        dispatch(Event::EnterMode(ModeRequest::Visual), &mut m);
        let r = dispatch(Event::Edit(EditKind::Insert(b'x')), &mut m);
        assert_eq!(r, DispatchResult::clean());
        assert_eq!(m.state().document().text_lines(), vec!["ab"]);
        dispatch(Event::Escape, &mut m);
        assert_eq!(m.state().mode, Mode::Normal);
    }

    #[test]
    fn blocked_motion_is_clean() {
        let mut m = model(&["ab"]);
        assert_eq!(
            dispatch(Event::Motion(MotionKind::Left), &mut m),
            DispatchResult::clean()
        );
        assert_eq!(
            dispatch(Event::Motion(MotionKind::LineEnd), &mut m),
            DispatchResult::dirty()
        );
        assert_eq!(m.cursor(), Position::new(0, 2));
    }

    #[test]
    fn empty_undo_sets_status() {
        let mut m = model(&[""]);
        dispatch(Event::Undo, &mut m);
        assert_eq!(m.state().status_text(), Some("nothing to undo!"));
        dispatch(Event::Redo, &mut m);
        assert_eq!(m.state().status_text(), Some("nothing to redo!"));
    }

    #[test]
    fn reload_without_name_reports() {
        let mut m = model(&["a"]);
        let r = dispatch(Event::Load(None), &mut m);
        assert!(!r.buffer_replaced);
        assert_eq!(m.state().status_text(), Some("file has no name"));
    }
}
