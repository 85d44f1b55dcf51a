use html_escape::decode_html_entities;

use crate::dom::{Document, Element, NodeId};

use super::MarkupError;
use super::lexer::{TokenKind, Tokens};

/// Elements that never have children or a closing tag.
pub(crate) const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is taken verbatim, without tags or entities.
pub(crate) const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Name used for the synthetic root element.
pub const ROOT_TAG: &str = "body";

/// Parse `src` into a [`Document`] whose root is a synthetic `body` element.
///
/// Text is kept exactly as written apart from entity decoding, so the
/// concatenated text of the tree is what a reader would see.
pub fn parse(src: &str) -> Result<Document, MarkupError> {
    let mut doc = Document::new(ROOT_TAG);
    let root = doc.root();
    let mut open: Vec<NodeId> = vec![root];
    let mut pending = String::new();
    let mut tokens = Tokens::new(src);

    while let Some(token) = tokens.next() {
        let parent = open.last().copied().unwrap_or(root);
        match token.kind {
            TokenKind::Comment | TokenKind::Doctype => {}
            TokenKind::Text => pending.push_str(&decode_html_entities(token.text)),
            TokenKind::Lt => {
                if src[token.span.end..].starts_with('/') {
                    return Err(MarkupError::MalformedTag {
                        offset: token.span.start,
                    });
                }
                pending.push('<');
            }
            TokenKind::OpenTag => {
                flush_text(&mut doc, parent, &mut pending);
                let (element, self_closing) = open_tag(token.text);
                let tag = element.tag.clone();
                let id = doc.create_element(element);
                doc.append_child(parent, id);

                if self_closing || VOID_TAGS.contains(&tag.as_str()) {
                    continue;
                }
                if RAW_TEXT_TAGS.contains(&tag.as_str()) {
                    let raw = tokens.raw_text(&tag);
                    if !raw.is_empty() {
                        let text = doc.create_text(raw);
                        doc.append_child(id, text);
                    }
                }
                open.push(id);
            }
            TokenKind::CloseTag => {
                flush_text(&mut doc, parent, &mut pending);
                let found = close_tag(token.text);
                if VOID_TAGS.contains(&found.as_str()) {
                    continue;
                }
                let expected = tag_of(&doc, parent);
                if parent != root && expected == found {
                    open.pop();
                } else if open[1..].iter().any(|&id| tag_of(&doc, id) == found) {
                    return Err(MarkupError::MismatchedTag {
                        expected,
                        found,
                        offset: token.span.start,
                    });
                } else {
                    return Err(MarkupError::UnmatchedClose {
                        tag: found,
                        offset: token.span.start,
                    });
                }
            }
        }
    }

    let parent = open.last().copied().unwrap_or(root);
    if parent != root {
        return Err(MarkupError::Unclosed {
            tag: tag_of(&doc, parent),
        });
    }
    flush_text(&mut doc, root, &mut pending);
    log::trace!("parsed {} nodes", doc.len());
    Ok(doc)
}

fn flush_text(doc: &mut Document, parent: NodeId, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let text = doc.create_text(std::mem::take(pending));
    doc.append_child(parent, text);
}

fn tag_of(doc: &Document, id: NodeId) -> String {
    doc.element(id).map(|el| el.tag.clone()).unwrap_or_default()
}

/// Tag name of a `</name>` token, lowercased.
fn close_tag(text: &str) -> String {
    text.trim_start_matches("</")
        .trim_end_matches('>')
        .trim_end()
        .to_ascii_lowercase()
}

/// Build the element described by an `<name attr...>` token. The flag is
/// set for `<name/>`.
fn open_tag(text: &str) -> (Element, bool) {
    let inner = &text[1..text.len() - 1];
    let (inner, self_closing) = match inner.trim_end().strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let name_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(inner.len());
    let mut element = Element::new(&inner[..name_len]);
    for (name, value) in attributes(&inner[name_len..]) {
        element.set_attr(name, value);
    }
    element.hidden = element.attr("hidden").is_some()
        || element.attr("style").is_some_and(super::style_hides);

    (element, self_closing)
}

/// `name`, `name=value`, `name="value"` and `name='value'` pairs, in order.
/// Names are lowercased; values have entities decoded.
fn attributes(mut rest: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            return attrs;
        }

        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = rest[..name_len].to_ascii_lowercase();
        rest = rest[name_len..].trim_start();

        let Some(after_eq) = rest.strip_prefix('=') else {
            attrs.push((name, String::new()));
            continue;
        };
        let after_eq = after_eq.trim_start();
        let (value, remainder) = match after_eq.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &after_eq[1..];
                let end = body.find(quote).unwrap_or(body.len());
                (&body[..end], body.get(end + 1..).unwrap_or(""))
            }
            _ => {
                let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                after_eq.split_at(end)
            }
        };
        attrs.push((name, decode_html_entities(value).into_owned()));
        rest = remainder;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_builds_tree_under_synthetic_root() {
        let doc = parse("Hello <em>world</em> wide web").unwrap();
        let root = doc.root();
        assert_eq!(doc.element(root).unwrap().tag, "body");
        assert_eq!(doc.children(root).len(), 3);
        assert_eq!(doc.text_content(root), "Hello world wide web");
    }

    #[test]
    fn test_decodes_entities_in_text_and_attributes() {
        let doc = parse("<p title=\"a &amp; b\">1 &lt; 2 &amp;&amp; x</p>").unwrap();
        let p = doc.children(doc.root())[0];
        assert_eq!(doc.element(p).unwrap().attr("title"), Some("a & b"));
        assert_eq!(doc.text_content(p), "1 < 2 && x");
    }

    #[test]
    fn test_attribute_forms() {
        let doc = parse("<input type=checkbox checked data-x='1 2'>").unwrap();
        let input = doc.children(doc.root())[0];
        let el = doc.element(input).unwrap();
        assert_eq!(
            el.attrs,
            vec![
                ("type".to_string(), "checkbox".to_string()),
                ("checked".to_string(), String::new()),
                ("data-x".to_string(), "1 2".to_string()),
            ]
        );
    }

    #[test]
    fn test_void_and_self_closing_tags_take_no_children() {
        let doc = parse("a<br>b<img src=x.png/>c<span/>d").unwrap();
        let root = doc.root();
        assert_eq!(doc.children(root).len(), 7);
        assert_eq!(doc.text_content(root), "abcd");
    }

    #[test]
    fn test_comments_and_doctype_are_dropped() {
        let doc = parse("<!DOCTYPE html>one<!-- hidden note -->two").unwrap();
        assert_eq!(doc.text_content(doc.root()), "onetwo");
        // Text either side of a comment is one leaf
        assert_eq!(doc.text_nodes(doc.root()).len(), 1);
    }

    #[test]
    fn test_script_content_is_raw() {
        let doc = parse("<script>if (a<b && c) {}</script>").unwrap();
        let script = doc.children(doc.root())[0];
        let leaf = doc.children(script)[0];
        assert!(matches!(doc.kind(leaf), NodeKind::Text(t) if t == "if (a<b && c) {}"));
    }

    #[test]
    fn test_stray_lt_is_text() {
        let doc = parse("<p>a < b</p>").unwrap();
        assert_eq!(doc.text_content(doc.root()), "a < b");
    }

    #[rstest]
    #[case("<p hidden>x</p>", true)]
    #[case("<p style=\"display: none\">x</p>", true)]
    #[case("<p style=\"color:red; visibility:hidden\">x</p>", true)]
    #[case("<p style=\"display:block\">x</p>", false)]
    #[case("<p>x</p>", false)]
    fn test_hidden_elements(#[case] src: &str, #[case] hidden: bool) {
        let doc = parse(src).unwrap();
        let p = doc.children(doc.root())[0];
        assert_eq!(doc.element(p).unwrap().hidden, hidden);
    }

    #[test]
    fn test_tag_names_are_case_insensitive() {
        let doc = parse("<DIV>x</div>").unwrap();
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.element(div).unwrap().tag, "div");
    }

    #[test]
    fn test_mismatched_close_is_an_error() {
        let err = parse("<p><b>x</p></b>").unwrap_err();
        assert_eq!(
            err,
            MarkupError::MismatchedTag {
                expected: "b".to_string(),
                found: "p".to_string(),
                offset: 7,
            }
        );
    }

    #[test]
    fn test_unmatched_close_is_an_error() {
        let err = parse("x</i>").unwrap_err();
        assert_eq!(
            err,
            MarkupError::UnmatchedClose {
                tag: "i".to_string(),
                offset: 1,
            }
        );
    }

    #[test]
    fn test_unclosed_tag_is_an_error() {
        let err = parse("<div><p>x</p>").unwrap_err();
        assert_eq!(
            err,
            MarkupError::Unclosed {
                tag: "div".to_string()
            }
        );
    }

    #[test]
    fn test_broken_close_tag_is_malformed() {
        let err = parse("<p>x</ p>").unwrap_err();
        assert_eq!(err, MarkupError::MalformedTag { offset: 4 });
    }
}
