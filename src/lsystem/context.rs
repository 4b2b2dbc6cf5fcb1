//! Context matching
//!
//!     Decides whether the neighborhood of an occurrence satisfies a context pattern. The axiom
//!     is walked outward from the occurrence (leftward for `before`, rightward for `after`) and
//!     compared positionally with the pattern.
//!
//! Branch Transparency
//!
//!     Branches are sub-sequences delimited by `[` and `]`. Following the usual convention,
//!     context must see through sibling branches unless the pattern asks to enter one:
//!
//!         axiom: B A [ C ] D      A>D  matches (the branch [C] is skipped)
//!                                 A>[C]D matches (the pattern enters the branch explicitly)
//!                                 A>[E]D fails
//!
//!     The branch depth counts every bracket crossed while scanning. Once the pattern has
//!     entered a branch, every branch opened inside it is remembered on a stack, marked by
//!     whether the pattern itself opened it. Symbols are compared while the branch depth is
//!     zero or the innermost open branch is one the pattern opened. Branches the pattern did
//!     not ask for are stepped over, at any nesting level:
//!
//!         axiom: A [ C [ E ] ] D  A>[C[E]]D matches (both branches followed)
//!                                 A>[C]D    matches (the inner [E] is stepped over)
//!                                 A>[C[X]]D fails
//!
//!     Ignored symbols met outside a branch are transparent. Any other mismatch outside a
//!     branch fails immediately. Running off the end of the axiom before the pattern is fully
//!     consumed fails as well.
//!
//!     Reading leftward, `]` opens a branch and `[` closes it.

use crate::lsystem::axiom::AxiomPart;
use crate::lsystem::symbols::{Alphabet, BRANCH_SYMBOLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

/// Match `pattern` against the neighborhood of `axiom[index]`
pub fn matches_context(
    axiom: &[AxiomPart],
    index: usize,
    pattern: &[String],
    direction: Direction,
    ignored: &Alphabet,
) -> bool {
    if pattern.is_empty() {
        return true;
    }

    // Normalize to a forward walk: positions outward from the occurrence, pattern in the
    // order it will be met
    let (positions, expected, open, close): (Box<dyn Iterator<Item = usize>>, Vec<&str>, _, _) =
        match direction {
            Direction::Before => (
                Box::new((0..index.min(axiom.len())).rev()),
                pattern.iter().rev().map(String::as_str).collect(),
                BRANCH_SYMBOLS[1],
                BRANCH_SYMBOLS[0],
            ),
            Direction::After => (
                Box::new(index.saturating_add(1)..axiom.len()),
                pattern.iter().map(String::as_str).collect(),
                BRANCH_SYMBOLS[0],
                BRANCH_SYMBOLS[1],
            ),
        };

    let mut cursor = 0usize;
    let mut depth = 0usize;
    // One entry per branch entered while following the pattern, true when the pattern opened it
    let mut explicit: Vec<bool> = Vec::new();

    for position in positions {
        let symbol = axiom[position].symbol.as_str();
        let wanted = expected[cursor];
        let tracking = depth == 0 || explicit.last() == Some(&true);

        if symbol == wanted && tracking {
            if symbol == open {
                explicit.push(true);
                depth += 1;
            } else if symbol == close {
                explicit.pop();
                depth = depth.saturating_sub(1);
            }
            cursor += 1;
            if cursor == expected.len() {
                return true;
            }
        } else if symbol == open {
            depth += 1;
            if !explicit.is_empty() {
                explicit.push(false);
            }
        } else if symbol == close {
            depth = depth.saturating_sub(1);
            explicit.pop();
        } else if (depth == 0 || (tracking && wanted != close)) && !ignored.contains(symbol) {
            return false;
        }
    }

    false
}
