//! Core event types and the cooperative shutdown flag for scrawl.
//!
//! Events are what an input source (terminal key translation, a script, a
//! test) hands to the dispatcher. They carry no document coordinates: every
//! edit and motion applies at the current cursor.
//!
//! The textual form parsed by [`Event::parse_line`] is the script format read
//! by the headless binary, one event per line:
//!
//! ```text
//! i <text>      insert text (one Insert per byte)
//! r <text>      overwrite text (one Replace per byte)
//! x             backspace
//! enter         split line at cursor
//! join          join cursor line onto the previous one
//! u | redo      undo / redo
//! h j k l       left down up right
//! 0 $ gg G      line start / line end / file start / file end
//! goto <n>      jump to 1-based line n
//! mode <m>      insert | replace | visual | command
//! esc           back to normal mode
//! resize <r> <c>
//! w [path]      save
//! e [path]      load
//! q             quit
//! ```
//!
//! Blank lines and lines starting with `#` produce no events.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Top-level event enum consumed by the run loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Edit(EditKind),
    Undo,
    Redo,
    Motion(MotionKind),
    /// Jump to a 0-based line index.
    Goto(usize),
    EnterMode(ModeRequest),
    Escape,
    Resize { rows: u16, cols: u16 },
    Save(Option<PathBuf>),
    Load(Option<PathBuf>),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert(u8),
    Replace(u8),
    Backspace,
    Newline,
    JoinLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    FileStart,
    FileEnd,
}

/// Modes reachable from Normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    Insert,
    Replace,
    Visual,
    CommandLine,
}

impl FromStr for ModeRequest {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insert" => Ok(ModeRequest::Insert),
            "replace" => Ok(ModeRequest::Replace),
            "visual" => Ok(ModeRequest::Visual),
            "command" => Ok(ModeRequest::CommandLine),
            other => Err(ParseEventError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEventError {
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    #[error("unknown mode `{0}`")]
    UnknownMode(String),
    #[error("`{verb}` expects {expected}")]
    BadArgument {
        verb: &'static str,
        expected: &'static str,
    },
}

impl Event {
    /// Parse one script line into zero or more events.
    pub fn parse_line(line: &str) -> Result<Vec<Event>, ParseEventError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(Vec::new());
        }
        let (verb, rest) = match trimmed.split_once(' ') {
            Some((v, r)) => (v, r),
            None => (trimmed, ""),
        };
        let single = |e: Event| Ok(vec![e]);
        match verb {
            // Text arguments keep inner and trailing spaces verbatim.
            "i" => Ok(rest
                .bytes()
                .map(|b| Event::Edit(EditKind::Insert(b)))
                .collect()),
            "r" => Ok(rest
                .bytes()
                .map(|b| Event::Edit(EditKind::Replace(b)))
                .collect()),
            "x" => single(Event::Edit(EditKind::Backspace)),
            "enter" => single(Event::Edit(EditKind::Newline)),
            "join" => single(Event::Edit(EditKind::JoinLine)),
            "u" => single(Event::Undo),
            "redo" => single(Event::Redo),
            "h" => single(Event::Motion(MotionKind::Left)),
            "j" => single(Event::Motion(MotionKind::Down)),
            "k" => single(Event::Motion(MotionKind::Up)),
            "l" => single(Event::Motion(MotionKind::Right)),
            "0" => single(Event::Motion(MotionKind::LineStart)),
            "$" => single(Event::Motion(MotionKind::LineEnd)),
            "gg" => single(Event::Motion(MotionKind::FileStart)),
            "G" => single(Event::Motion(MotionKind::FileEnd)),
            "goto" => {
                let n: usize = rest
                    .trim()
                    .parse()
                    .map_err(|_| ParseEventError::BadArgument {
                        verb: "goto",
                        expected: "a line number",
                    })?;
                single(Event::Goto(n.saturating_sub(1)))
            }
            "mode" => single(Event::EnterMode(rest.trim().parse()?)),
            "esc" => single(Event::Escape),
            "resize" => {
                let bad = || ParseEventError::BadArgument {
                    verb: "resize",
                    expected: "<rows> <cols>",
                };
                let mut it = rest.split_whitespace();
                let rows = it.next().and_then(|s| s.parse().ok()).ok_or_else(bad)?;
                let cols = it.next().and_then(|s| s.parse().ok()).ok_or_else(bad)?;
                single(Event::Resize { rows, cols })
            }
            "w" => single(Event::Save(optional_path(rest))),
            "e" => single(Event::Load(optional_path(rest))),
            "q" => single(Event::Quit),
            other => Err(ParseEventError::UnknownEvent(other.to_string())),
        }
    }
}

fn optional_path(rest: &str) -> Option<PathBuf> {
    let p = rest.trim();
    (!p.is_empty()).then(|| PathBuf::from(p))
}

/// Cooperative stop signal shared between the run loop and whoever wants it
/// to end (signal handler, test harness). Checked between events.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// The underlying atomic, for code that sets it directly (signal handlers).
    pub fn shared(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}
