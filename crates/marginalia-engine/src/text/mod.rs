//! # Text Comparison
//!
//! Everything that compares text goes through [`normalize`] first: whitespace
//! is dropped and letters are lowercased, so reflowed or re-cased pages still
//! match. Normalized text is never shown to users.
//!
//! ## Modules
//!
//! - **`normalize`**: canonical form plus mapping of normalized offsets back
//!   to raw byte offsets
//! - **`similarity`**: Levenshtein distance and the `[0, 1]` similarity score

pub mod normalize;
pub mod similarity;

pub use normalize::{normalize, raw_end, raw_start};
pub use similarity::{distance, similarity};
