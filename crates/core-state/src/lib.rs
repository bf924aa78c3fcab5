//! Editing session state: the document, its undo history, the modal state and
//! the status line message.
//!
//! Undo model:
//! - Every user edit records exactly one [`Command`]: the edit's inverse,
//!   computed against the document before the edit runs.
//! - Undo pops that command, applies it, and pushes *its* inverse onto the redo
//!   stack. Redo mirrors this, so the two stacks trade commands indefinitely
//!   without ever snapshotting the document.
//! - Both stacks are bounded (see [`CommandStack`]); the oldest entry falls off
//!   when a push would exceed the depth.
//! - Recording a new edit clears the redo stack.
//!
//! The history belongs to one document. Loading a different file replaces the
//! document and starts a fresh history (see [`EditorState::replace_document`]).
//!
//! View concerns (cursor, scroll, gutter) live in `core-model`; this crate is
//! document-centric.

use std::time::{Duration, Instant};

use core_text::Document;
use tracing::debug;

pub mod command;
pub mod undo;

pub use command::Command;
pub use undo::{CommandStack, History, HistoryEmpty, MAX_DEPTH};

/// How long a status message stays visible unless replaced.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigation and single-key commands.
    #[default]
    Normal,
    /// Typed bytes are inserted before the cursor.
    Insert,
    /// Typed bytes overwrite the byte under the cursor.
    Replace,
    /// Character selection.
    Visual,
    /// Typing an ex-style command.
    CommandLine,
}

impl Mode {
    /// Normal fans out to every other mode; every other mode only returns to
    /// Normal.
    pub fn can_transition_to(self, to: Mode) -> bool {
        match (self, to) {
            (Mode::Normal, Mode::Normal) => false,
            (Mode::Normal, _) => true,
            (_, Mode::Normal) => true,
            _ => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Replace => "REPLACE",
            Mode::Visual => "VISUAL",
            Mode::CommandLine => "COMMAND",
        }
    }
}

/// Status line message that expires after a fixed duration.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// One editing session over a single document.
#[derive(Debug)]
pub struct EditorState {
    document: Document,
    history: History,
    history_depth: usize,
    pub mode: Mode,
    pub ephemeral_status: Option<EphemeralMessage>,
}

impl EditorState {
    pub fn new(document: Document) -> Self {
        Self::with_history_depth(document, MAX_DEPTH)
    }

    pub fn with_history_depth(document: Document, history_depth: usize) -> Self {
        Self {
            document,
            history: History::with_depth(history_depth),
            history_depth,
            mode: Mode::Normal,
            ephemeral_status: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access. Edits made through this bypass the history.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Split borrow used when an edit and its undo record happen together.
    pub fn document_and_history_mut(&mut self) -> (&mut Document, &mut History) {
        (&mut self.document, &mut self.history)
    }

    /// Swap in a newly loaded document; its history starts empty.
    pub fn replace_document(&mut self, document: Document) -> Document {
        self.history = History::with_depth(self.history_depth);
        std::mem::replace(&mut self.document, document)
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Enter `to` if the mode graph allows it. Returns whether the mode changed.
    pub fn set_mode(&mut self, to: Mode) -> bool {
        if !self.mode.can_transition_to(to) {
            debug!(target: "state.mode", from = ?self.mode, to = ?to, "transition_rejected");
            return false;
        }
        debug!(target: "state.mode", from = ?self.mode, to = ?to, "transition");
        self.mode = to;
        true
    }

    /// Set an ephemeral status message with a fixed timeout duration.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Status message with the default lifetime.
    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.set_ephemeral(msg, STATUS_TTL);
    }

    pub fn status_text(&self) -> Option<&str> {
        self.ephemeral_status.as_ref().map(|m| m.text.as_str())
    }

    /// Tick ephemeral status; returns true if message expired and was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        if let Some(m) = &self.ephemeral_status
            && Instant::now() >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }
}
