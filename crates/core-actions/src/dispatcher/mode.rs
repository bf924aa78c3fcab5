//! Mode transitions. Normal reaches every other mode; escape returns to Normal.

use core_events::ModeRequest;
use core_state::{EditorState, Mode};

use super::DispatchResult;

pub(crate) fn mode_for(req: ModeRequest) -> Mode {
    match req {
        ModeRequest::Insert => Mode::Insert,
        ModeRequest::Replace => Mode::Replace,
        ModeRequest::Visual => Mode::Visual,
        ModeRequest::CommandLine => Mode::CommandLine,
    }
}

pub(crate) fn handle_enter(req: ModeRequest, state: &mut EditorState) -> DispatchResult {
    if state.set_mode(mode_for(req)) {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_escape(state: &mut EditorState) -> DispatchResult {
    if state.set_mode(Mode::Normal) {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
