//! # Anchoring
//!
//! Re-finds a remembered snippet in the current tree.
//!
//! ## Pipeline
//!
//! 1. **`locate`**: every range whose normalized text equals the needle,
//!    including matches split across adjacent text leaves
//! 2. **`disambiguate`**: when there are several, pick the one whose
//!    surrounding text best matches the remembered context
//! 3. **`refine`**: trim boundary whitespace; later, split boundary text
//!    nodes so a marker can wrap whole leaves
//!
//! **`context`** extracts the before/after windows, both when a highlight is
//! first captured and when candidates are scored, so the two always agree.
//!
//! Everything here works on the *content text nodes* of a search root: text
//! leaves with no hidden or non-content element (script, form controls, ...)
//! above them.

pub mod context;
pub mod disambiguate;
pub mod locate;
pub mod refine;

pub use context::{after_context, before_context};
pub use disambiguate::{PERFECT_SCORE, disambiguate};
pub use locate::locate;
pub use refine::{split_boundaries, trim_whitespace};
