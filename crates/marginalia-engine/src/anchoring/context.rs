use crate::config::EngineConfig;
use crate::cursor::TextCursor;
use crate::dom::{Boundary, Document, NodeId, TextRange};
use crate::text::normalize;

/// The last `len` normalized chars of content text before `range`.
pub fn before_context(
    doc: &Document,
    root: NodeId,
    range: TextRange,
    len: usize,
    config: &EngineConfig,
) -> String {
    let leaves = doc.content_text_nodes(root, |el| config.excludes(el));
    context_before(doc, &leaves, range.start, len)
}

/// The first `len` normalized chars of content text after `range`.
pub fn after_context(
    doc: &Document,
    root: NodeId,
    range: TextRange,
    len: usize,
    config: &EngineConfig,
) -> String {
    let leaves = doc.content_text_nodes(root, |el| config.excludes(el));
    context_after(doc, &leaves, range.end, len)
}

pub(crate) fn context_before(
    doc: &Document,
    leaves: &[NodeId],
    at: Boundary,
    len: usize,
) -> String {
    let mut cursor = TextCursor::at(doc, leaves, at);
    let mut raw = Vec::new();
    let mut folded = 0;
    while folded < len {
        match cursor.bump_back() {
            None => break,
            Some(c) if c.is_whitespace() => {}
            Some(c) => {
                folded += c.to_lowercase().count();
                raw.push(c);
            }
        }
    }
    let raw: String = raw.into_iter().rev().collect();
    let norm: Vec<char> = normalize(&raw).chars().collect();
    norm[norm.len().saturating_sub(len)..].iter().collect()
}

pub(crate) fn context_after(doc: &Document, leaves: &[NodeId], at: Boundary, len: usize) -> String {
    let mut cursor = TextCursor::at(doc, leaves, at);
    let mut raw = String::new();
    let mut folded = 0;
    while folded < len {
        match cursor.bump() {
            None => break,
            Some(c) if c.is_whitespace() => {}
            Some(c) => {
                folded += c.to_lowercase().count();
                raw.push(c);
            }
        }
    }
    normalize(&raw).chars().take(len).collect()
}
