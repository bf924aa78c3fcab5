//! File IO helpers: open and save with status reporting.
//!
//! Synchronous and blocking. Failures never lose the in-memory document: a
//! failed open falls back to a fresh document, a failed save leaves the
//! current one untouched and dirty.

use std::path::Path;

use core_state::EditorState;
use core_text::{Document, DocumentError};

/// Result of opening a path. Always carries a usable document.
#[derive(Debug)]
pub struct OpenOutcome {
    pub document: Document,
    /// Status line text; `None` when there was nothing to report.
    pub status: Option<String>,
    pub error: Option<DocumentError>,
}

impl OpenOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Load `path` into a new document. A missing file opens as a new, named
/// document; an unreadable one falls back to an unnamed empty document.
pub fn open_document(path: Option<&Path>) -> OpenOutcome {
    match Document::load(path) {
        Ok(document) => {
            let status = document
                .path()
                .map(|p| format!("loaded file '{}'", p.display()));
            tracing::info!(target: "io", name = %document.display_name(), lines = document.line_count(), "file_open");
            OpenOutcome {
                document,
                status,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, "file_open_error");
            let name = path.map(|p| p.display().to_string()).unwrap_or_default();
            OpenOutcome {
                document: Document::new(),
                status: Some(format!("failed to load '{name}': {}", io_reason(&e))),
                error: Some(e),
            }
        }
    }
}

/// Save the session's document to `target` (or its own name) and report the
/// outcome on the status line.
pub fn save_document(state: &mut EditorState, target: Option<&Path>) -> Result<(), DocumentError> {
    match state.document_mut().save(target) {
        Ok(()) => {
            let name = state.document().display_name();
            tracing::info!(target: "io", %name, lines = state.document().line_count(), "file_write");
            state.set_status(format!("saved file as '{name}'"));
            Ok(())
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, "file_write_error");
            let status = match &e {
                DocumentError::Unnamed => e.to_string(),
                DocumentError::Io { path, .. } => {
                    format!("failed to save '{}': {}", path.display(), io_reason(&e))
                }
            };
            state.set_status(status);
            Err(e)
        }
    }
}

fn io_reason(e: &DocumentError) -> String {
    match e {
        DocumentError::Io { source, .. } => source.to_string(),
        DocumentError::Unnamed => e.to_string(),
    }
}
