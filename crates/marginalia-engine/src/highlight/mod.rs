//! # Highlights
//!
//! Visual realization of an anchored range.
//!
//! A highlight is the ordered list of marker elements one injection produced.
//! A range inside a single text leaf gets one marker; a range that crosses
//! `<em>` or paragraph boundaries gets one marker per text leaf, so ancestor
//! structure is never broken. Removal unwraps each marker and merges the
//! text it held back into its neighbours.
//!
//! ## Modules
//!
//! - **`marker`**: [`MarkerFactory`] and the default [`StyledMarker`]
//! - **`inject`**: wrap every content leaf of a range
//! - **`remove`**: unwrap one marker, or every marker under a root

pub mod inject;
pub mod marker;
pub mod remove;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dom::{Document, NodeId};

pub use inject::inject;
pub use marker::{HIGHLIGHT_ID_ATTR, MarkerFactory, StyledMarker};
pub use remove::{remove, remove_all};

/// Identifies every marker that belongs to one highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighlightId(pub Uuid);

impl HighlightId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HighlightId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The markers produced by one injection, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub id: HighlightId,
    pub markers: Vec<NodeId>,
}

impl Highlight {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Text currently wrapped by the markers.
    pub fn text(&self, doc: &Document) -> String {
        self.markers.iter().map(|&m| doc.text_content(m)).collect()
    }

    /// Remove every marker of this highlight.
    pub fn remove(&self, doc: &mut Document) {
        for &marker in &self.markers {
            remove(doc, marker);
        }
    }
}
