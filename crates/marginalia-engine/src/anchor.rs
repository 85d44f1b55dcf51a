use serde::{Deserialize, Serialize};

use crate::anchoring::{after_context, before_context};
use crate::config::EngineConfig;
use crate::dom::{Document, NodeId, TextRange};
use crate::error::AnchorError;
use crate::text::normalize;

/// Durable description of a highlight: the matched text plus normalized
/// context on either side.
///
/// Records are immutable once created and are resolved against whatever tree
/// is current at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRecord {
    text: String,
    #[serde(default)]
    before: String,
    #[serde(default)]
    after: String,
}

impl AnchorRecord {
    pub fn new(text: impl Into<String>, before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            before: before.into(),
            after: after.into(),
        }
    }

    /// Record the live `range` under `root`: its raw content text and the
    /// configured amount of context around it.
    ///
    /// Text under excluded elements is left out, so the record holds exactly
    /// what resolution will search for.
    pub fn capture(
        doc: &Document,
        root: NodeId,
        range: TextRange,
        config: &EngineConfig,
    ) -> Result<Self, AnchorError> {
        for node in [range.start.node, range.end.node] {
            if !doc.contains(root, node) {
                return Err(AnchorError::DetachedNode(node));
            }
        }
        if !doc.is_well_formed(range) {
            return Err(AnchorError::InvalidRange);
        }

        let leaves = doc.content_text_nodes(root, |el| config.excludes(el));
        let text: String = doc
            .segments_in(range, leaves)
            .into_iter()
            .filter_map(|seg| doc.text(seg.node).map(|t| &t[seg.bytes]))
            .collect();
        if normalize(&text).is_empty() {
            return Err(AnchorError::EmptyText);
        }

        let len = config.context_length;
        Ok(Self {
            before: before_context(doc, root, range, len, config),
            after: after_context(doc, root, range, len, config),
            text,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn before(&self) -> &str {
        &self.before
    }

    pub fn after(&self) -> &str {
        &self.after
    }
}
