//! Shared helpers for unit tests.

use crate::dom::Document;
use crate::markup;

/// Parse a test page; panics on malformed markup.
pub fn page(src: &str) -> Document {
    markup::parse(src).expect("test markup should parse")
}
