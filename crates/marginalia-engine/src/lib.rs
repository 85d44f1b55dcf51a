//! # marginalia-engine
//!
//! Re-anchors remembered text snippets in a document tree and highlights
//! them reversibly.
//!
//! A snippet is stored as an [`AnchorRecord`]: the text itself plus a short
//! window of normalized context on each side. Resolving a record searches the
//! current tree for every place the text occurs (across element boundaries
//! if need be), picks the occurrence whose context fits best, and trims the
//! result. Injection wraps each text leaf of the range in a marker element;
//! removal unwraps the markers and merges the text back together. The text
//! of the tree is never changed by any of this.
//!
//! [`Engine`] bundles these operations with one [`EngineConfig`].

pub mod anchor;
pub mod anchoring;
pub mod config;
pub mod cursor;
pub mod dom;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod markup;
pub mod text;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use anchor::AnchorRecord;
pub use config::EngineConfig;
pub use dom::{ActivateHandler, Boundary, Document, Element, NodeId, NodeKind, TextRange};
pub use engine::{Engine, Reconciled};
pub use error::AnchorError;
pub use highlight::{Highlight, HighlightId, MarkerFactory};
pub use markup::{MarkupError, inner_markup, parse, to_markup};
