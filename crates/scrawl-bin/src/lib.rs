//! Headless session driver.
//!
//! Builds an [`EditorModel`] from the command line and configuration, then
//! feeds it events read one per line from a script until the script ends, a
//! `q` arrives, or the shutdown flag is raised.

use std::io::BufRead;
use std::path::Path;

use anyhow::Result;
use core_actions::{dispatch, io_ops};
use core_config::Config;
use core_events::{Event, ShutdownFlag};
use core_model::{EditorModel, View};
use core_state::EditorState;
use tracing::{debug, info, warn};

/// Terminal size assumed until a `resize` event says otherwise.
pub const DEFAULT_ROWS: usize = 24;
pub const DEFAULT_COLS: usize = 80;

/// How a session run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    EndOfScript,
    Quit,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub reason: ExitReason,
    pub events: usize,
    pub rejected_lines: usize,
}

/// Open `path` and build the model the run loop drives.
pub fn bootstrap(path: Option<&Path>, config: &mut Config) -> EditorModel {
    let opened = io_ops::open_document(path);
    let open_failed = !opened.is_ok();
    let mut state = EditorState::with_history_depth(opened.document, config.history_depth());
    if let Some(status) = opened.status {
        state.set_status(status);
    }
    let view = View::new(DEFAULT_ROWS, DEFAULT_COLS).with_reserved_rows(config.reserved_rows());
    let effective_margin = config.apply_text_rows(view.text_rows());
    let view = view.with_vertical_margin(effective_margin);
    info!(
        target: "runtime.startup",
        name = %state.document().display_name(),
        lines = state.document().line_count(),
        open_failed,
        history_depth = config.history_depth(),
        effective_margin,
        "bootstrap_complete"
    );
    EditorModel::new(state, view)
}

/// Route SIGINT and SIGTERM to `shutdown`. The run loop stops before the next
/// event; a second signal after that exits the process with status 1.
#[cfg(unix)]
pub fn install_signal_handlers(shutdown: &ShutdownFlag) -> std::io::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::flag;

    for sig in [SIGINT, SIGTERM] {
        // Registered first so it sees the flag before this signal sets it.
        flag::register_conditional_shutdown(sig, 1, shutdown.shared())?;
        flag::register(sig, shutdown.shared())?;
    }
    debug!(target: "runtime", "signal_handlers_installed");
    Ok(())
}

#[cfg(not(unix))]
pub fn install_signal_handlers(_shutdown: &ShutdownFlag) -> std::io::Result<()> {
    debug!(target: "runtime", "signal_handlers_unsupported");
    Ok(())
}

/// Drive `model` with events parsed from `script`, one per line.
pub fn run_script<R: BufRead>(
    model: &mut EditorModel,
    config: &mut Config,
    script: R,
    shutdown: &ShutdownFlag,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary {
        reason: ExitReason::EndOfScript,
        events: 0,
        rejected_lines: 0,
    };
    for (lineno, line) in script.lines().enumerate() {
        let line = line?;
        let events = match Event::parse_line(&line) {
            Ok(events) => events,
            Err(e) => {
                warn!(target: "runtime", line = lineno + 1, error = %e, "script_line_rejected");
                model.state_mut().set_status(e.to_string());
                summary.rejected_lines += 1;
                continue;
            }
        };
        for event in events {
            if shutdown.is_requested() {
                info!(target: "runtime", events = summary.events, "shutdown_requested");
                summary.reason = ExitReason::Shutdown;
                return Ok(summary);
            }
            let resized = matches!(event, Event::Resize { .. });
            let result = dispatch(event, model);
            summary.events += 1;
            if resized
                && let Some(margin) = config.recompute_after_resize(model.view().text_rows())
            {
                let (state, view) = model.split_state_and_view();
                view.set_vertical_margin(state.document(), margin);
                debug!(target: "runtime", margin, "scroll_margin_recomputed");
            }
            if result.quit {
                shutdown.request();
                summary.reason = ExitReason::Quit;
                info!(target: "runtime", events = summary.events, "quit");
                return Ok(summary);
            }
        }
    }
    Ok(summary)
}

/// One-line summary: name, modified marker, 1-based position, mode, message.
pub fn status_line(model: &EditorModel) -> String {
    let state = model.state();
    let doc = state.document();
    let cursor = model.cursor();
    let mut line = format!(
        "{}{} {}:{} {}",
        doc.display_name(),
        if doc.is_dirty() { " [+]" } else { "" },
        cursor.line + 1,
        cursor.col + 1,
        state.mode.label(),
    );
    if let Some(msg) = state.status_text() {
        line.push_str(" | ");
        line.push_str(msg);
    }
    line
}
