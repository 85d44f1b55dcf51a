use crate::dom::{Boundary, Document, NodeId, TextRange};

/// Pull each end of `range` inward past whitespace.
///
/// Only text in `leaves` counts. If nothing but whitespace is left the range
/// is returned unchanged: trimming it would be meaningless.
pub fn trim_whitespace(doc: &Document, leaves: &[NodeId], range: TextRange) -> TextRange {
    let chars: Vec<(NodeId, usize, char)> = doc
        .segments_in(range, leaves.iter().copied())
        .into_iter()
        .flat_map(|seg| {
            let text = doc.text(seg.node).unwrap_or("");
            let start = seg.bytes.start;
            text[seg.bytes]
                .char_indices()
                .map(move |(i, c)| (seg.node, start + i, c))
        })
        .collect();

    let Some(first) = chars.iter().position(|&(.., c)| !c.is_whitespace()) else {
        return range;
    };
    let last = chars
        .iter()
        .rposition(|&(.., c)| !c.is_whitespace())
        .unwrap_or(first);

    let mut trimmed = range;
    if first > 0 {
        let (node, at, _) = chars[first];
        trimmed.start = Boundary::new(node, at);
    }
    if last + 1 < chars.len() {
        let (node, at, c) = chars[last];
        trimmed.end = Boundary::new(node, at + c.len_utf8());
    }
    trimmed
}

/// Split text nodes so that neither boundary falls strictly inside one.
///
/// Returns the equivalent range expressed on the new node edges. The
/// concatenated text of the tree is unchanged.
pub fn split_boundaries(doc: &mut Document, range: TextRange) -> TextRange {
    let mut range = range;

    if inside_text(doc, range.start) {
        let node = range.start.node;
        let offset = range.start.offset;
        let parent_slot = doc.parent(node).zip(doc.child_index(node));
        if let Some(right) = doc.split_text(node, offset) {
            if range.end.node == node {
                range.end = Boundary::new(right, range.end.offset - offset);
            } else if let Some((parent, index)) = parent_slot {
                range.end = shift_for_insert(range.end, parent, index);
            }
            range.start = Boundary::new(right, 0);
        }
    }

    if inside_text(doc, range.end) {
        // The left half keeps the id, so `range.end` now sits on its edge
        doc.split_text(range.end.node, range.end.offset);
    }

    range
}

fn inside_text(doc: &Document, at: Boundary) -> bool {
    doc.text(at.node)
        .is_some_and(|text| at.offset > 0 && at.offset < text.len())
}

/// Child-index boundaries on `parent` after a node was inserted right after
/// the child at `index`.
fn shift_for_insert(at: Boundary, parent: NodeId, index: usize) -> Boundary {
    if at.node == parent && at.offset > index {
        Boundary::new(parent, at.offset + 1)
    } else {
        at
    }
}
