//! Property tests for line capacity policy and document load/save symmetry.

use core_text::{Document, Line, MIN_CAPACITY};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, u8),
    Delete(usize),
    Replace(usize, u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<usize>(), b'a'..=b'z').prop_map(|(a, c)| Op::Insert(a, c)),
        2 => any::<usize>().prop_map(Op::Delete),
        1 => (any::<usize>(), b'A'..=b'Z').prop_map(|(a, c)| Op::Replace(a, c)),
    ]
}

proptest! {
    // Capacity stays a power of two, at least MIN_CAPACITY, at least len.
    #[test]
    fn capacity_invariants_hold(ops in prop::collection::vec(op(), 0..300)) {
        let mut line = Line::new();
        let mut model: Vec<u8> = Vec::new();
        for op in ops {
            match op {
                Op::Insert(a, c) => {
                    let at = a % (model.len() + 1);
                    line.insert_char(at, c);
                    model.insert(at, c);
                }
                Op::Delete(a) => {
                    let at = a % (model.len() + 1);
                    let got = line.delete_char(at);
                    let want = if at == 0 { None } else { Some(model.remove(at - 1)) };
                    prop_assert_eq!(got, want);
                }
                Op::Replace(a, c) => {
                    let at = a % (model.len() + 1);
                    let got = line.replace_char(at, c);
                    let want = if at < model.len() {
                        Some(std::mem::replace(&mut model[at], c))
                    } else {
                        model.push(c);
                        None
                    };
                    prop_assert_eq!(got, want);
                }
            }
            prop_assert_eq!(line.as_bytes(), &model[..]);
            prop_assert!(line.capacity() >= MIN_CAPACITY);
            prop_assert!(line.capacity().is_power_of_two());
            prop_assert!(line.capacity() >= line.len());
        }
    }

    // Saving writes every line plus '\n'; reading it back in any chunk size
    // yields the same lines.
    #[test]
    fn serialized_lines_reload_identically(
        lines in prop::collection::vec("[a-z ]{0,12}", 1..20),
        chunk in 1usize..32,
    ) {
        let doc = Document::from_lines(lines.iter().map(|s| s.as_bytes()));
        let mut bytes = Vec::new();
        doc.write_lines(&mut bytes).unwrap();
        let back = Document::load_from_reader(&bytes[..], chunk).unwrap();
        prop_assert_eq!(back.text_lines(), lines);
    }
}
