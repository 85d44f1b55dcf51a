use crate::anchoring::split_boundaries;
use crate::config::EngineConfig;
use crate::dom::{ActivateHandler, Boundary, Document, NodeId, NodeKind, TextRange};

use super::MarkerFactory;

/// Position of the document-order walk over a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    At(NodeId),
    Done,
}

impl Walk {
    /// First node at or after `start`.
    fn start(doc: &Document, start: Boundary) -> Self {
        let scope = doc.top(start.node);
        match doc.kind(start.node) {
            NodeKind::Text(_) => Walk::At(start.node),
            NodeKind::Element(_) => match doc.children(start.node).get(start.offset) {
                Some(&child) => Walk::At(child),
                None => Walk::after_subtree(doc, start.node, scope),
            },
        }
    }

    fn after_subtree(doc: &Document, node: NodeId, scope: NodeId) -> Self {
        doc.next_skipping_children(node, scope)
            .map_or(Walk::Done, Walk::At)
    }

    /// Pre-order successor: first child, next sibling, then an ancestor's
    /// next sibling.
    fn advance(self, doc: &Document, scope: NodeId) -> Self {
        match self {
            Walk::At(node) => doc.next_in_order(node, scope).map_or(Walk::Done, Walk::At),
            Walk::Done => Walk::Done,
        }
    }
}

/// Wrap every content text leaf inside `range` in a marker from `factory`.
///
/// Boundary leaves are split first so each marker holds a whole leaf.
/// Returns the markers in document order; a collapsed or reversed range
/// changes nothing and yields no markers.
pub fn inject(
    doc: &mut Document,
    range: TextRange,
    factory: &dyn MarkerFactory,
    on_activate: Option<&ActivateHandler>,
    config: &EngineConfig,
) -> Vec<NodeId> {
    if range.is_collapsed() || !doc.is_well_formed(range) {
        log::debug!("skipping injection of collapsed or reversed range");
        return Vec::new();
    }

    let range = split_boundaries(doc, range);
    let scope = doc.top(range.start.node);
    let mut markers = Vec::new();
    let mut walk = Walk::start(doc, range.start);

    while let Walk::At(node) = walk {
        if doc
            .compare_boundaries(Boundary::new(node, 0), range.end)
            .is_ge()
        {
            break;
        }
        // The marker takes the leaf's place, so the successor is unaffected
        walk = walk.advance(doc, scope);

        if !wraps(doc, node, range, config) {
            continue;
        }
        let marker = factory.create(doc);
        if let Some(handler) = on_activate {
            doc.set_handler(marker, handler.clone());
        }
        if doc.wrap(node, marker) {
            log::trace!("wrapped {node} in marker {marker}");
            markers.push(marker);
        }
    }

    log::debug!("injected {} marker(s)", markers.len());
    markers
}

/// Whether `node` is a non-empty content leaf with text inside `range`.
fn wraps(doc: &Document, node: NodeId, range: TextRange, config: &EngineConfig) -> bool {
    let Some(text) = doc.text(node) else {
        return false;
    };
    let starts_at_end = node == range.start.node && range.start.offset >= text.len();
    !text.is_empty() && !starts_at_end && doc.is_content_text(node, |el| config.excludes(el))
}
