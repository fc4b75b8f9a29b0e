//! Applying a pass's edits to the text it was matched against.
//!
//! Edits are recorded in the coordinates of the text at matching time. They
//! are applied in one forward pass, so an edit's position in the output is its
//! recorded position plus the running offset of every edit before it.

use std::ops::Range;

/// Replace `range` of the matched text with `replacement`.
///
/// An empty range is an insertion, an empty replacement a removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl Edit {
    pub fn insert(at: usize, text: String) -> Self {
        Self {
            range: at..at,
            replacement: text,
        }
    }

    pub fn remove(range: Range<usize>) -> Self {
        Self {
            range,
            replacement: String::new(),
        }
    }

    /// Change in text length caused by this edit.
    pub fn delta(&self) -> isize {
        self.replacement.len() as isize - self.range.len() as isize
    }
}

/// Applies `edits` to `source` and returns the edited text with the final running offset.
///
/// `edits` must be in ascending order and must not overlap; the matches
/// they come from are found in document order and never overlap.
pub fn apply_edits(source: &str, edits: &[Edit]) -> (String, isize) {
    let growth: isize = edits.iter().map(Edit::delta).sum();
    let mut output = String::with_capacity(source.len().saturating_add_signed(growth));
    let mut cursor = 0;
    let mut offset = 0isize;
    for edit in edits {
        debug_assert!(edit.range.start >= cursor, "edits out of order");
        output.push_str(&source[cursor..edit.range.start]);
        debug_assert_eq!(
            output.len() as isize,
            edit.range.start as isize + offset
        );
        output.push_str(&edit.replacement);
        offset += edit.delta();
        cursor = edit.range.end;
    }
    output.push_str(&source[cursor..]);
    (output, offset)
}
