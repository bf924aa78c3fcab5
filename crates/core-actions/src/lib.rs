//! Command application boundary between an input source and the editing
//! engine.
//!
//! An external dispatcher (key translation, a script, tests) decides *what*
//! to do and calls in here; this crate mutates the document, records undo
//! history, keeps the view consistent and reports status text.

pub mod dispatcher;
pub mod io_ops;

pub use dispatcher::{
    CursorDelta, DispatchResult, HistoryStatus, apply_and_record, dispatch, redo, undo,
};
pub use io_ops::{OpenOutcome, open_document, save_document};
