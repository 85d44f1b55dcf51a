use crate::dom::{Document, NodeId, TextRange};
use crate::text::similarity;

use super::context::{context_after, context_before};

/// Score of a candidate whose surrounding text matches exactly on both sides.
pub const PERFECT_SCORE: f64 = 3.0;

/// Pick the candidate whose surroundings best match `before` / `after`
/// (both already normalized).
///
/// A single candidate wins without scoring. Otherwise each one scores
/// `1 + similarity(before) + similarity(after)`; a perfect score returns at
/// once, and on ties the earliest candidate in document order is kept.
pub fn disambiguate(
    doc: &Document,
    leaves: &[NodeId],
    candidates: Vec<TextRange>,
    before: &str,
    after: &str,
    context_length: usize,
) -> Option<TextRange> {
    if candidates.len() <= 1 {
        return candidates.into_iter().next();
    }

    let mut best: Option<(f64, TextRange)> = None;
    for (i, candidate) in candidates.into_iter().enumerate() {
        let actual_before = context_before(doc, leaves, candidate.start, context_length);
        let actual_after = context_after(doc, leaves, candidate.end, context_length);
        let score =
            1.0 + similarity(&actual_before, before) + similarity(&actual_after, after);
        log::trace!("candidate {i} scored {score:.3}");

        if score >= PERFECT_SCORE {
            log::debug!("candidate {i} matches its context exactly");
            return Some(candidate);
        }
        // Strict comparison: ties keep the earlier candidate
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, range)| range)
}
