use std::cmp::Ordering;
use std::ops::Range;

use super::{Document, NodeId};

/// A position in the tree.
///
/// For a text node `offset` is a byte offset into its string, always on a
/// `char` boundary. For an element it is a child index: the boundary
/// immediately before the child at that index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

impl Boundary {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// An ordered pair of boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: Boundary,
    pub end: Boundary,
}

impl TextRange {
    pub fn new(start: Boundary, end: Boundary) -> Self {
        Self { start, end }
    }

    /// Range within a single text node.
    pub fn within(node: NodeId, bytes: Range<usize>) -> Self {
        Self::new(Boundary::new(node, bytes.start), Boundary::new(node, bytes.end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// The part of one text node covered by a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub node: NodeId,
    pub bytes: Range<usize>,
}

impl Document {
    /// Child-index path from the top of the tree down to `id`.
    fn path(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(self.child_index(current).unwrap_or(0));
            current = parent;
        }
        path.reverse();
        path
    }

    /// Compare two boundaries in document order.
    pub fn compare_boundaries(&self, a: Boundary, b: Boundary) -> Ordering {
        if a.node == b.node {
            return a.offset.cmp(&b.offset);
        }
        let pa = self.path(a.node);
        let pb = self.path(b.node);
        let common = pa.iter().zip(&pb).take_while(|(x, y)| x == y).count();
        match (common == pa.len(), common == pb.len()) {
            // Distinct roots of unrelated trees
            (true, true) => a.node.cmp(&b.node),
            // a.node is an ancestor of b.node
            (true, false) => {
                if a.offset <= pb[common] {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, true) => {
                if b.offset <= pa[common] {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, false) => pa[common].cmp(&pb[common]),
        }
    }

    /// A range is well-formed if its start does not come after its end.
    pub fn is_well_formed(&self, range: TextRange) -> bool {
        range.start.offset <= self.max_offset(range.start.node)
            && range.end.offset <= self.max_offset(range.end.node)
            && self.compare_boundaries(range.start, range.end) != Ordering::Greater
    }

    /// The non-empty parts of `leaves` (text nodes in document order) that
    /// fall inside `range`.
    pub fn segments_in(
        &self,
        range: TextRange,
        leaves: impl IntoIterator<Item = NodeId>,
    ) -> Vec<Segment> {
        let mut out = Vec::new();
        for node in leaves {
            let Some(text) = self.text(node) else {
                continue;
            };
            let len = text.len();
            let from = if node == range.start.node {
                range.start.offset
            } else if self.compare_boundaries(Boundary::new(node, 0), range.start)
                == Ordering::Less
            {
                continue;
            } else {
                0
            };
            let to = if node == range.end.node {
                range.end.offset
            } else if self.compare_boundaries(Boundary::new(node, len), range.end)
                == Ordering::Greater
            {
                break;
            } else {
                len
            };
            if from < to {
                out.push(Segment {
                    node,
                    bytes: from..to,
                });
            }
        }
        out
    }

    /// Raw text covered by `range` (all text nodes, visible or not).
    pub fn range_text(&self, range: TextRange) -> String {
        let scope = self.top(range.start.node);
        self.segments_in(range, self.text_nodes(scope))
            .into_iter()
            .filter_map(|seg| self.text(seg.node).map(|t| &t[seg.bytes]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use pretty_assertions::assert_eq;

    /// body > [p > ["alpha"], p > ["beta", em > ["gamma"]]]
    fn two_paragraphs() -> (Document, [NodeId; 6]) {
        let mut doc = Document::new("body");
        let root = doc.root();
        let p1 = doc.create_element(Element::new("p"));
        let alpha = doc.create_text("alpha");
        let p2 = doc.create_element(Element::new("p"));
        let beta = doc.create_text("beta");
        let em = doc.create_element(Element::new("em"));
        let gamma = doc.create_text("gamma");
        doc.append_child(root, p1);
        doc.append_child(p1, alpha);
        doc.append_child(root, p2);
        doc.append_child(p2, beta);
        doc.append_child(p2, em);
        doc.append_child(em, gamma);
        (doc, [p1, alpha, p2, beta, em, gamma])
    }

    #[test]
    fn test_compare_same_node_uses_offsets() {
        let (doc, [_, alpha, ..]) = two_paragraphs();
        assert_eq!(
            doc.compare_boundaries(Boundary::new(alpha, 1), Boundary::new(alpha, 3)),
            Ordering::Less
        );
        assert_eq!(
            doc.compare_boundaries(Boundary::new(alpha, 3), Boundary::new(alpha, 3)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_follows_tree_order() {
        let (doc, [_, alpha, _, beta, _, gamma]) = two_paragraphs();
        assert_eq!(
            doc.compare_boundaries(Boundary::new(alpha, 5), Boundary::new(beta, 0)),
            Ordering::Less
        );
        assert_eq!(
            doc.compare_boundaries(Boundary::new(gamma, 0), Boundary::new(beta, 4)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_element_boundary_against_descendant() {
        let (doc, [_, _, p2, beta, _, gamma]) = two_paragraphs();
        // (p2, 1) sits between "beta" and the <em>
        let between = Boundary::new(p2, 1);
        assert_eq!(
            doc.compare_boundaries(between, Boundary::new(beta, 4)),
            Ordering::Greater
        );
        assert_eq!(
            doc.compare_boundaries(between, Boundary::new(gamma, 0)),
            Ordering::Less
        );
        assert_eq!(
            doc.compare_boundaries(Boundary::new(gamma, 0), between),
            Ordering::Greater
        );
    }

    #[test]
    fn test_range_text_spans_elements() {
        let (doc, [_, alpha, _, _, _, gamma]) = two_paragraphs();
        let range = TextRange::new(Boundary::new(alpha, 2), Boundary::new(gamma, 3));
        assert!(doc.is_well_formed(range));
        assert_eq!(doc.range_text(range), "phabetagam");
    }

    #[test]
    fn test_range_text_with_element_boundaries() {
        let (doc, [_, _, p2, ..]) = two_paragraphs();
        let range = TextRange::new(Boundary::new(p2, 0), Boundary::new(p2, 1));
        assert_eq!(doc.range_text(range), "beta");
    }

    #[test]
    fn test_reversed_range_is_not_well_formed() {
        let (doc, [_, alpha, _, beta, ..]) = two_paragraphs();
        let range = TextRange::new(Boundary::new(beta, 1), Boundary::new(alpha, 1));
        assert!(!doc.is_well_formed(range));
        let out_of_bounds = TextRange::within(alpha, 0..99);
        assert!(!doc.is_well_formed(out_of_bounds));
    }

    #[test]
    fn test_collapsed_range() {
        let (_, [_, alpha, ..]) = two_paragraphs();
        assert!(TextRange::within(alpha, 2..2).is_collapsed());
        assert!(!TextRange::within(alpha, 2..3).is_collapsed());
    }
}
