use crate::dom::{Document, NodeId};

use super::HIGHLIGHT_ID_ATTR;

/// Unwrap `marker`, merge the text it held back into its neighbours and drop
/// its activation handler.
///
/// Removing a marker that is already detached does nothing.
pub fn remove(doc: &mut Document, marker: NodeId) {
    let Some(parent) = doc.unwrap(marker) else {
        log::trace!("marker {marker} already detached");
        return;
    };
    doc.merge_text_children(parent);
    doc.clear_handler(marker);
}

/// Remove every highlight marker under `root`. Returns how many were removed.
pub fn remove_all(doc: &mut Document, root: NodeId) -> usize {
    let mut markers = Vec::new();
    let mut current = Some(root);
    while let Some(id) = current {
        if id != root
            && doc
                .element(id)
                .is_some_and(|el| el.attr(HIGHLIGHT_ID_ATTR).is_some())
        {
            markers.push(id);
        }
        current = doc.next_in_order(id, root);
    }

    for &marker in &markers {
        remove(doc, marker);
    }
    log::debug!("removed {} marker(s) under {root}", markers.len());
    markers.len()
}
