use std::cmp::Ordering;

use crate::dom::{Boundary, Document, NodeId};

/// A char-by-char cursor over a run of text nodes in document order.
///
/// The cursor sits between two chars. Moving past the end of one node
/// continues at the start of the next, so node boundaries are invisible to
/// callers.
#[derive(Clone)]
pub struct TextCursor<'a> {
    doc: &'a Document,
    /// Text nodes in document order.
    leaves: &'a [NodeId],
    /// Index into `leaves`; `leaves.len()` means past the last leaf.
    idx: usize,
    /// Byte offset within `leaves[idx]`.
    offset: usize,
}

impl<'a> TextCursor<'a> {
    /// Place a cursor at `boundary`. Boundaries outside the leaves (element
    /// boundaries, or text the leaves skip) snap to the start of the first
    /// leaf at or after them.
    pub fn at(doc: &'a Document, leaves: &'a [NodeId], boundary: Boundary) -> Self {
        if let Some(idx) = leaves.iter().position(|&t| t == boundary.node) {
            return Self {
                doc,
                leaves,
                idx,
                offset: boundary.offset,
            };
        }
        let idx = leaves
            .iter()
            .position(|&t| doc.compare_boundaries(Boundary::new(t, 0), boundary) != Ordering::Less)
            .unwrap_or(leaves.len());
        Self {
            doc,
            leaves,
            idx,
            offset: 0,
        }
    }

    fn leaf_text(&self, idx: usize) -> &'a str {
        self.leaves
            .get(idx)
            .and_then(|&t| self.doc.text(t))
            .unwrap_or("")
    }

    /// Returns the char after the cursor without moving.
    pub fn peek(&self) -> Option<char> {
        self.clone().bump()
    }

    /// Advances past the next char, returning it.
    pub fn bump(&mut self) -> Option<char> {
        while self.idx < self.leaves.len() {
            let text = self.leaf_text(self.idx);
            if let Some(c) = text.get(self.offset..).and_then(|rest| rest.chars().next()) {
                self.offset += c.len_utf8();
                return Some(c);
            }
            if self.idx + 1 == self.leaves.len() {
                return None;
            }
            self.idx += 1;
            self.offset = 0;
        }
        None
    }

    /// Moves back over the previous char, returning it.
    pub fn bump_back(&mut self) -> Option<char> {
        loop {
            if self.idx < self.leaves.len() {
                let text = self.leaf_text(self.idx);
                if let Some(c) = text
                    .get(..self.offset)
                    .and_then(|before| before.chars().next_back())
                {
                    self.offset -= c.len_utf8();
                    return Some(c);
                }
            }
            if self.idx == 0 {
                return None;
            }
            self.idx -= 1;
            self.offset = self.leaf_text(self.idx).len();
        }
    }
}
