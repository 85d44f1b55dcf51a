//! # Document Tree
//!
//! An ordered tree of text and element nodes stored in an arena.
//!
//! Nodes are addressed by [`NodeId`]s that stay valid for the lifetime of the
//! [`Document`]: splitting a text node, wrapping a leaf in a marker or
//! unwrapping it again are all table mutations, never pointer surgery.
//! Detached nodes remain in the arena with no parent; ids are never reused.
//!
//! ## Modules
//!
//! - **`range`**: [`Boundary`] / [`TextRange`] values and document-order
//!   comparison of boundaries

pub mod range;

use std::fmt;
use std::rc::Rc;

pub use range::{Boundary, Segment, TextRange};

/// Stable handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callback run when the user interacts with a marker element.
#[derive(Clone)]
pub struct ActivateHandler(Rc<dyn Fn(NodeId)>);

impl ActivateHandler {
    pub fn new(f: impl Fn(NodeId) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, marker: NodeId) {
        (self.0)(marker)
    }
}

impl fmt::Debug for ActivateHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActivateHandler(..)")
    }
}

/// An element node's payload.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<(String, String)>,
    /// Whether the element is currently hidden (not rendered)
    pub hidden: bool,
    pub(crate) on_activate: Option<ActivateHandler>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn has_handler(&self) -> bool {
        self.on_activate.is_some()
    }
}

/// The two node kinds of the tree.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree with a single root element.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Create a document whose root is an empty element with the given tag.
    pub fn new(root_tag: &str) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.create_element(Element::new(root_tag));
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.push(NodeKind::Element(element))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Text(_))
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Largest valid boundary offset for `id`: byte length for text, child
    /// count for elements.
    pub fn max_offset(&self, id: NodeId) -> usize {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => text.len(),
            NodeKind::Element(_) => self.nodes[id.0].children.len(),
        }
    }

    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.child_index(id)?;
        self.children(parent).get(idx + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.child_index(id)?;
        idx.checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Topmost ancestor of `id` (the root for attached nodes).
    pub fn top(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// True if `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` among `parent`'s children, detaching it first.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(!self.contains(child, parent), "cannot insert a node into itself");
        self.detach(child);
        let index = index.min(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Remove `id` from its parent. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Put `wrapper` where `node` is and move `node` inside it.
    ///
    /// Returns false (and does nothing) if `node` has no parent.
    pub fn wrap(&mut self, node: NodeId, wrapper: NodeId) -> bool {
        let (Some(parent), Some(index)) = (self.parent(node), self.child_index(node)) else {
            return false;
        };
        self.detach(node);
        self.insert_child(parent, index, wrapper);
        self.append_child(wrapper, node);
        true
    }

    /// Replace `node` with its own children, in place.
    ///
    /// Returns the former parent, or `None` if `node` was detached.
    pub fn unwrap(&mut self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let index = self.child_index(node)?;
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for &child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        let siblings = &mut self.nodes[parent.0].children;
        siblings.remove(index);
        for (i, &child) in children.iter().enumerate() {
            siblings.insert(index + i, child);
        }
        self.nodes[node.0].parent = None;
        Some(parent)
    }

    /// Split a text node at byte `offset`; the right half becomes a new next
    /// sibling which is returned.
    ///
    /// Returns `None` for element nodes or offsets off a char boundary.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        let NodeKind::Text(text) = &mut self.nodes[id.0].kind else {
            return None;
        };
        if !text.is_char_boundary(offset) {
            return None;
        }
        let right = text.split_off(offset);
        let right = self.create_text(right);
        if let (Some(parent), Some(index)) = (self.parent(id), self.child_index(id)) {
            self.insert_child(parent, index + 1, right);
        }
        Some(right)
    }

    /// Merge runs of adjacent text children of `parent` into their first node
    /// and drop empty text children.
    pub fn merge_text_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            let Some(text) = self.text(child).map(str::to_owned) else {
                kept.push(child);
                continue;
            };
            let merge_into = kept.last().copied().filter(|&prev| self.is_text(prev));
            match merge_into {
                _ if text.is_empty() => self.nodes[child.0].parent = None,
                Some(prev) => {
                    if let NodeKind::Text(existing) = &mut self.nodes[prev.0].kind {
                        existing.push_str(&text);
                    }
                    self.nodes[child.0].parent = None;
                }
                None => kept.push(child),
            }
        }
        self.nodes[parent.0].children = kept;
    }

    /// Concatenated text of every text node under `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        self.text_nodes(id)
            .into_iter()
            .filter_map(|t| self.text(t))
            .collect()
    }

    /// Pre-order successor of `id` within the subtree of `scope`.
    pub fn next_in_order(&self, id: NodeId, scope: NodeId) -> Option<NodeId> {
        if let Some(&first) = self.children(id).first() {
            return Some(first);
        }
        self.next_skipping_children(id, scope)
    }

    /// Pre-order successor of `id` that is not one of its descendants.
    pub fn next_skipping_children(&self, id: NodeId, scope: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            if current == scope {
                return None;
            }
            if let Some(next) = self.next_sibling(current) {
                return Some(next);
            }
            current = self.parent(current)?;
        }
    }

    /// Every text node under `scope`, in document order.
    pub fn text_nodes(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.is_text(id) {
                out.push(id);
            }
            current = self.next_in_order(id, scope);
        }
        out
    }

    /// Text nodes under `scope` that are readable content: no element on the
    /// way down from the top of the tree is `excluded`.
    pub fn content_text_nodes(
        &self,
        scope: NodeId,
        excluded: impl Fn(&Element) -> bool,
    ) -> Vec<NodeId> {
        if !self.ancestors_allow(scope, &excluded) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            current = match &self.nodes[id.0].kind {
                NodeKind::Text(_) => {
                    out.push(id);
                    self.next_in_order(id, scope)
                }
                NodeKind::Element(el) if id != scope && excluded(el) => {
                    self.next_skipping_children(id, scope)
                }
                NodeKind::Element(_) => self.next_in_order(id, scope),
            };
        }
        out
    }

    /// True if `id` is a text node and none of its ancestors are `excluded`.
    pub fn is_content_text(&self, id: NodeId, excluded: impl Fn(&Element) -> bool) -> bool {
        self.is_text(id) && self.ancestors_allow(id, &excluded)
    }

    fn ancestors_allow(&self, id: NodeId, excluded: &impl Fn(&Element) -> bool) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(el) = self.element(node)
                && excluded(el)
            {
                return false;
            }
            current = self.parent(node);
        }
        true
    }

    pub fn set_handler(&mut self, id: NodeId, handler: ActivateHandler) {
        if let Some(el) = self.element_mut(id) {
            el.on_activate = Some(handler);
        }
    }

    pub fn clear_handler(&mut self, id: NodeId) {
        if let Some(el) = self.element_mut(id) {
            el.on_activate = None;
        }
    }

    /// Run the activation handler attached to `id`, if any.
    ///
    /// Returns whether a handler ran.
    pub fn activate(&self, id: NodeId) -> bool {
        match self.element(id).and_then(|el| el.on_activate.as_ref()) {
            Some(handler) => {
                handler.call(id);
                true
            }
            None => false,
        }
    }
}
