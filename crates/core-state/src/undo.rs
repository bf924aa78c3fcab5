use core_text::{Document, Position};
use thiserror::Error;
use tracing::trace;

use crate::command::Command;

/// Default number of commands retained per stack.
pub const MAX_DEPTH: usize = 64;

/// Bounded stack of reversible commands.
///
/// When full, a push drops the oldest (bottom) entry before appending, so the
/// stack always keeps the most recent `max_depth` commands.
#[derive(Debug, Clone)]
pub struct CommandStack {
    entries: Vec<Command>,
    max_depth: usize,
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::with_depth(MAX_DEPTH)
    }
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack retaining at most `max_depth` commands (at least one).
    pub fn with_depth(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            entries: Vec::with_capacity(max_depth),
            max_depth,
        }
    }

    pub fn push(&mut self, cmd: Command) {
        if self.entries.len() == self.max_depth {
            let evicted = self.entries.remove(0);
            trace!(target: "state.undo", cmd = evicted.name(), depth = self.max_depth, "evict_oldest");
        }
        self.entries.push(cmd);
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&Command> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter()
    }
}

/// Which stack was empty when an undo or redo was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryEmpty {
    #[error("nothing to undo!")]
    Undo,
    #[error("nothing to redo!")]
    Redo,
}

/// Undo and redo stacks for one document.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: CommandStack,
    redo: CommandStack,
}

impl History {
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            undo: CommandStack::with_depth(max_depth),
            redo: CommandStack::with_depth(max_depth),
        }
    }

    /// Record the inverse of an edit that was just applied. A new edit
    /// invalidates everything that could have been redone.
    pub fn record(&mut self, inverse: Command) {
        self.undo.push(inverse);
        if !self.redo.is_empty() {
            self.redo.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
        trace!(target: "state.undo", undo_depth = self.undo.len(), redo_depth = self.redo.len(), "push");
    }

    /// Revert the most recent edit. Returns the caret position to restore.
    pub fn undo(&mut self, doc: &mut Document) -> Result<Position, HistoryEmpty> {
        let cmd = self.undo.pop().ok_or(HistoryEmpty::Undo)?;
        trace!(target: "state.undo", cmd = cmd.name(), undo_depth = self.undo.len(), redo_depth = self.redo.len(), "undo_pop");
        let reverse = cmd.invert(doc);
        let at = cmd.apply(doc);
        self.redo.push(reverse);
        Ok(at)
    }

    /// Reapply the most recently undone edit.
    pub fn redo(&mut self, doc: &mut Document) -> Result<Position, HistoryEmpty> {
        let cmd = self.redo.pop().ok_or(HistoryEmpty::Redo)?;
        trace!(target: "state.undo", cmd = cmd.name(), undo_depth = self.undo.len(), redo_depth = self.redo.len(), "redo_pop");
        let reverse = cmd.invert(doc);
        let at = cmd.apply(doc);
        self.undo.push(reverse);
        Ok(at)
    }

    pub fn undo_stack(&self) -> &CommandStack {
        &self.undo
    }

    pub fn redo_stack(&self) -> &CommandStack {
        &self.redo
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
