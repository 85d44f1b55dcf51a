use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::dom::{Document, Element, NodeId, NodeKind};

use super::parser::{RAW_TEXT_TAGS, VOID_TAGS};
use super::style_hides;

/// Serialize `node` and its subtree.
pub fn to_markup(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

/// Serialize the children of `node`, without the node's own tags.
pub fn inner_markup(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(node) {
        write_node(doc, child, &mut out);
    }
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.kind(node) {
        NodeKind::Text(text) => {
            let raw = doc
                .parent(node)
                .and_then(|p| doc.element(p))
                .is_some_and(|el| RAW_TEXT_TAGS.contains(&el.tag.as_str()));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&encode_text(text));
            }
        }
        NodeKind::Element(el) => {
            write_open_tag(el, out);
            let children = doc.children(node);
            if children.is_empty() && VOID_TAGS.contains(&el.tag.as_str()) {
                return;
            }
            for &child in children {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}

fn write_open_tag(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&encode_double_quoted_attribute(value));
            out.push('"');
        }
    }
    // Hidden set programmatically still has to survive a round trip
    let declared = el.attr("hidden").is_some() || el.attr("style").is_some_and(style_hides);
    if el.hidden && !declared {
        out.push_str(" hidden");
    }
    out.push('>');
}
