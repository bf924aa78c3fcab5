#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use core_actions::{apply_and_record, dispatch};
use core_events::{EditKind, Event};
use core_model::{EditorModel, View};
use core_state::EditorState;
use core_text::{Document, Position};

pub fn model(lines: &[&str]) -> EditorModel {
    model_with_depth(lines, core_state::MAX_DEPTH)
}

pub fn model_with_depth(lines: &[&str], depth: usize) -> EditorModel {
    let doc = Document::from_lines(lines.iter().map(|l| l.as_bytes()));
    EditorModel::new(
        EditorState::with_history_depth(doc, depth),
        View::new(24, 80),
    )
}

pub fn lines(model: &EditorModel) -> Vec<String> {
    model.state().document().text_lines()
}

pub fn place(model: &mut EditorModel, line: usize, col: usize) {
    let (state, view) = model.split_state_and_view();
    view.set_cursor(state.document(), Position::new(line, col));
}

pub fn type_text(model: &mut EditorModel, text: &str) {
    for b in text.bytes() {
        apply_and_record(model, EditKind::Insert(b));
    }
}

pub fn run_script(model: &mut EditorModel, script: &str) {
    for line in script.lines() {
        for event in Event::parse_line(line).expect("fixture script parses") {
            if dispatch(event, model).quit {
                return;
            }
        }
    }
}
