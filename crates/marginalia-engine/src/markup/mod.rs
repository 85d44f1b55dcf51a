//! # Markup Adapter
//!
//! Reads a small HTML-like syntax into a [`Document`](crate::dom::Document)
//! and writes one back out. This is how pages get in and out of the engine
//! for the CLI and for tests; it is not an HTML5 parser.
//!
//! Supported: elements with quoted or bare attributes, void tags (`br`,
//! `hr`, `img`, `input`, ...), `<tag/>`, comments and doctypes (dropped),
//! character entities, and raw `script`/`style` bodies. Elements carrying a
//! `hidden` attribute or a hiding `style` are flagged hidden.
//!
//! ## Modules
//!
//! - **`lexer`**: Logos tokenizer
//! - **`parser`**: tokens to tree
//! - **`serialize`**: tree to markup

pub mod lexer;
pub mod parser;
pub mod serialize;

pub use parser::{ROOT_TAG, parse};
pub use serialize::{inner_markup, to_markup};

/// Errors from [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("expected </{expected}> but found </{found}> at byte {offset}")]
    MismatchedTag {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("closing tag </{tag}> at byte {offset} has no open element")]
    UnmatchedClose { tag: String, offset: usize },
    #[error("<{tag}> is never closed")]
    Unclosed { tag: String },
    #[error("malformed tag at byte {offset}")]
    MalformedTag { offset: usize },
}

/// True if an inline `style` value hides its element.
pub fn style_hides(style: &str) -> bool {
    style.split(';').any(|decl| {
        let decl = decl
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        decl == "display:none" || decl == "visibility:hidden"
    })
}
