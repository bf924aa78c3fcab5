//! Undo / redo at the model level: run the history against the document,
//! then move the cursor to where the reverted edit happened.

use core_model::EditorModel;
use core_state::HistoryEmpty;

use super::HistoryStatus;

pub fn undo(model: &mut EditorModel) -> HistoryStatus {
    step(model, Direction::Undo)
}

pub fn redo(model: &mut EditorModel) -> HistoryStatus {
    step(model, Direction::Redo)
}

#[derive(Clone, Copy)]
enum Direction {
    Undo,
    Redo,
}

fn step(model: &mut EditorModel, dir: Direction) -> HistoryStatus {
    let (state, view) = model.split_state_and_view();
    let (doc, history) = state.document_and_history_mut();
    let outcome = match dir {
        Direction::Undo => history.undo(doc),
        Direction::Redo => history.redo(doc),
    };
    match outcome {
        Ok(at) => {
            view.set_cursor(doc, at);
            let to = view.cursor();
            tracing::trace!(target: "actions.dispatch", op = dir.name(), line = to.line, col = to.col, "history");
            HistoryStatus::Applied
        }
        Err(empty) => {
            state.set_status(empty.to_string());
            match empty {
                HistoryEmpty::Undo => HistoryStatus::NothingToUndo,
                HistoryEmpty::Redo => HistoryStatus::NothingToRedo,
            }
        }
    }
}

impl Direction {
    fn name(self) -> &'static str {
        match self {
            Direction::Undo => "undo",
            Direction::Redo => "redo",
        }
    }
}
