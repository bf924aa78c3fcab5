//! Reversible edit commands.
//!
//! A `Command` names one primitive document edit. The undo stack never stores
//! snapshots: each entry is the command that reverses a past edit, computed
//! by [`Command::invert`] against the document *before* the edit ran.

use core_text::{Document, Line, Position};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Overwrite the byte at `col`. At end of line this inserts.
    ReplaceChar { line: usize, col: usize, ch: u8 },
    /// Insert `ch` at `col`.
    InsertChar { line: usize, col: usize, ch: u8 },
    /// Backspace at `col`: removes the byte at `col - 1`. `ch` is that byte.
    DeleteChar { line: usize, col: usize, ch: u8 },
    /// Break `line` at `col`.
    SplitLine { line: usize, col: usize },
    /// Join `line` onto its predecessor. `col` is the join column (the
    /// predecessor's length) and `content` an owned copy of the joined text.
    JoinLines {
        line: usize,
        col: usize,
        content: Line,
    },
}

impl Command {
    /// Short tag for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ReplaceChar { .. } => "replace_char",
            Command::InsertChar { .. } => "insert_char",
            Command::DeleteChar { .. } => "delete_char",
            Command::SplitLine { .. } => "split_line",
            Command::JoinLines { .. } => "join_lines",
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Command::ReplaceChar { line, .. }
            | Command::InsertChar { line, .. }
            | Command::DeleteChar { line, .. }
            | Command::SplitLine { line, .. }
            | Command::JoinLines { line, .. } => *line,
        }
    }

    /// Build the command that undoes `self`. Must be called while `doc` is
    /// still in the state `self` will be applied to.
    pub fn invert(&self, doc: &Document) -> Command {
        match *self {
            Command::ReplaceChar { line, col, ch } => match line_of(doc, line).byte_at(col) {
                Some(previous) => Command::ReplaceChar {
                    line,
                    col,
                    ch: previous,
                },
                None => Command::DeleteChar {
                    line,
                    col: col + 1,
                    ch,
                },
            },
            Command::InsertChar { line, col, ch } => Command::DeleteChar {
                line,
                col: col + 1,
                ch,
            },
            Command::DeleteChar { line, col, .. } => {
                assert!(col > 0, "delete at column 0 has no inverse");
                let removed = line_of(doc, line).byte_at(col - 1).unwrap_or_else(|| {
                    panic!("column {col} beyond end of line {line}");
                });
                Command::InsertChar {
                    line,
                    col: col - 1,
                    ch: removed,
                }
            }
            Command::SplitLine { line, col } => {
                let tail = line_of(doc, line).copy_range(col, None);
                Command::JoinLines {
                    line: line + 1,
                    col,
                    content: Line::from_bytes(&tail),
                }
            }
            Command::JoinLines { line, col, .. } => {
                assert!(line > 0, "join on the first line has no inverse");
                debug_assert_eq!(
                    col,
                    line_of(doc, line - 1).len(),
                    "join column must match the predecessor's length"
                );
                Command::SplitLine {
                    line: line - 1,
                    col,
                }
            }
        }
    }

    /// Perform the edit and return where the caret lands.
    pub fn apply(&self, doc: &mut Document) -> Position {
        trace!(target: "state.command", cmd = self.name(), line = self.line(), "apply");
        match *self {
            Command::ReplaceChar { line, col, ch } => {
                doc.replace_char(line, col, ch);
                Position::new(line, col)
            }
            Command::InsertChar { line, col, ch } => {
                doc.insert_char(line, col, ch);
                Position::new(line, col + 1)
            }
            Command::DeleteChar { line, col, .. } => {
                doc.delete_char(line, col);
                Position::new(line, col.saturating_sub(1))
            }
            Command::SplitLine { line, col } => {
                doc.break_line(line, col);
                Position::new(line + 1, 0)
            }
            Command::JoinLines { line, .. } => {
                let join_col = doc.move_line_up(line);
                Position::new(line.saturating_sub(1), join_col)
            }
        }
    }
}

fn line_of(doc: &Document, idx: usize) -> &Line {
    doc.get_line(idx).unwrap_or_else(|| {
        panic!(
            "line index {idx} out of bounds (document has {} lines)",
            doc.line_count()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|l| l.as_bytes()))
    }

    // Apply `cmd`, then its inverse; content and caret must come back.
    fn round_trip(lines: &[&str], cmd: Command, caret: Position) {
        let mut d = doc(lines);
        let inverse = cmd.invert(&d);
        cmd.apply(&mut d);
        let back = inverse.apply(&mut d);
        assert_eq!(d.text_lines(), lines, "content after undoing {cmd:?}");
        assert_eq!(back, caret, "caret after undoing {cmd:?}");
    }

    #[test]
    fn insert_inverts_to_delete_after_it() {
        let d = doc(&["abc"]);
        let cmd = Command::InsertChar {
            line: 0,
            col: 1,
            ch: b'X',
        };
        assert_eq!(
            cmd.invert(&d),
            Command::DeleteChar {
                line: 0,
                col: 2,
                ch: b'X'
            }
        );
        round_trip(&["abc"], cmd, Position::new(0, 1));
    }

    #[test]
    fn delete_inverts_to_insert_of_removed_byte() {
        let d = doc(&["abc"]);
        let cmd = Command::DeleteChar {
            line: 0,
            col: 2,
            ch: 0,
        };
        assert_eq!(
            cmd.invert(&d),
            Command::InsertChar {
                line: 0,
                col: 1,
                ch: b'b'
            }
        );
        round_trip(&["abc"], cmd, Position::new(0, 2));
    }

    #[test]
    fn replace_inverts_to_replace_of_previous_byte() {
        let d = doc(&["abc"]);
        let cmd = Command::ReplaceChar {
            line: 0,
            col: 0,
            ch: b'Z',
        };
        assert_eq!(
            cmd.invert(&d),
            Command::ReplaceChar {
                line: 0,
                col: 0,
                ch: b'a'
            }
        );
        round_trip(&["abc"], cmd, Position::new(0, 0));
    }

    #[test]
    fn replace_at_end_of_line_inverts_to_delete() {
        let d = doc(&["abc"]);
        let cmd = Command::ReplaceChar {
            line: 0,
            col: 3,
            ch: b'd',
        };
        assert!(matches!(
            cmd.invert(&d),
            Command::DeleteChar { line: 0, col: 4, ch: b'd' }
        ));
        round_trip(&["abc"], cmd, Position::new(0, 3));
    }

    #[test]
    fn split_inverts_to_join_carrying_tail() {
        let d = doc(&["abcd"]);
        let cmd = Command::SplitLine { line: 0, col: 2 };
        match cmd.invert(&d) {
            Command::JoinLines { line, col, content } => {
                assert_eq!((line, col), (1, 2));
                assert_eq!(content.as_bytes(), b"cd");
            }
            other => panic!("unexpected inverse {other:?}"),
        }
        for col in 0..=4 {
            round_trip(
                &["abcd", "next"],
                Command::SplitLine { line: 0, col },
                Position::new(0, col),
            );
        }
    }

    #[test]
    fn join_inverts_to_split_at_join_column() {
        let d = doc(&["ab", "cd"]);
        let cmd = Command::JoinLines {
            line: 1,
            col: 2,
            content: Line::from_bytes(b"cd"),
        };
        assert_eq!(cmd.invert(&d), Command::SplitLine { line: 0, col: 2 });
        round_trip(&["ab", "cd"], cmd, Position::new(1, 0));
    }

    #[test]
    fn join_with_empty_neighbours_round_trips() {
        for lines in [&["", "x"][..], &["x", ""][..], &["", ""][..]] {
            let cmd = Command::JoinLines {
                line: 1,
                col: lines[0].len(),
                content: Line::from_bytes(lines[1].as_bytes()),
            };
            round_trip(lines, cmd, Position::new(1, 0));
        }
    }

    #[test]
    fn apply_reports_landing_position() {
        let mut d = doc(&["ab", "cd"]);
        let at = Command::JoinLines {
            line: 1,
            col: 2,
            content: Line::from_bytes(b"cd"),
        }
        .apply(&mut d);
        assert_eq!(at, Position::new(0, 2));
        let at = Command::SplitLine { line: 0, col: 2 }.apply(&mut d);
        assert_eq!(at, Position::new(1, 0));
        assert_eq!(d.text_lines(), vec!["ab", "cd"]);
    }

    #[test]
    #[should_panic(expected = "join column")]
    fn join_with_stale_column_is_rejected() {
        let d = doc(&["abc", "d"]);
        Command::JoinLines {
            line: 1,
            col: 1,
            content: Line::from_bytes(b"d"),
        }
        .invert(&d);
    }

    #[test]
    #[should_panic(expected = "no inverse")]
    fn delete_at_column_zero_cannot_be_inverted() {
        let d = doc(&["abc"]);
        Command::DeleteChar {
            line: 0,
            col: 0,
            ch: 0,
        }
        .invert(&d);
    }
}
