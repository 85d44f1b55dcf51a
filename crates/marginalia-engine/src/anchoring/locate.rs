use crate::config::EngineConfig;
use crate::dom::{Boundary, Document, NodeId, TextRange};
use crate::text::{normalize, raw_end, raw_start};

/// All ranges under `root`, in document order, whose normalized text equals
/// the normalized `needle`.
pub fn locate(doc: &Document, root: NodeId, needle: &str, config: &EngineConfig) -> Vec<TextRange> {
    let leaves = doc.content_text_nodes(root, |el| config.excludes(el));
    locate_in(doc, &leaves, &normalize(needle))
}

/// Search `leaves` (content text nodes in document order) for an already
/// normalized needle.
pub(crate) fn locate_in(doc: &Document, leaves: &[NodeId], needle: &str) -> Vec<TextRange> {
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }

    for (i, &node) in leaves.iter().enumerate() {
        let raw = doc.text(node).unwrap_or("");
        let norm = normalize(raw);
        let before = found.len();

        for at in occurrences(&norm, needle) {
            found.push(TextRange::within(
                node,
                raw_start(raw, at)..raw_end(raw, at + needle.len()),
            ));
        }

        if found.len() == before {
            found.extend(across_leaves(doc, &leaves[i..], &norm, needle));
        }
    }

    log::debug!("located {} candidate(s) for {needle:?}", found.len());
    found
}

/// Byte offsets of every occurrence of `needle` in `haystack`, overlapping
/// ones included.
fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    let mut from = 0;
    std::iter::from_fn(move || {
        let at = from + haystack.get(from..)?.find(needle)?;
        from = at + haystack[at..].chars().next().map_or(1, char::len_utf8);
        Some(at)
    })
}

/// Matches that start in the tail of `leaves[0]` and finish in a later leaf.
///
/// `norm` is the normalized text of `leaves[0]`. Each prefix length `k` for
/// which the leaf ends with `needle[..k]` is a separate candidate; longer
/// prefixes start earlier, so results come out in document order.
fn across_leaves(doc: &Document, leaves: &[NodeId], norm: &str, needle: &str) -> Vec<TextRange> {
    let Some((&first, rest)) = leaves.split_first() else {
        return Vec::new();
    };
    let raw = doc.text(first).unwrap_or("");
    let longest = norm.len().min(needle.len().saturating_sub(1));

    (1..=longest)
        .rev()
        .filter(|&k| needle.is_char_boundary(k) && norm.ends_with(&needle[..k]))
        .filter_map(|k| {
            let end = finish_match(doc, rest, &needle[k..])?;
            log::trace!("cross-leaf match from {first} with {k} leading bytes");
            let start = Boundary::new(first, raw_start(raw, norm.len() - k));
            Some(TextRange::new(start, end))
        })
        .collect()
}

/// Consume `remaining` from the start of the following leaves.
///
/// Leaves that normalize to nothing are passed over; a leaf that is a
/// prefix of what remains is consumed whole; a leaf that starts with what
/// remains ends the match.
fn finish_match(doc: &Document, leaves: &[NodeId], mut remaining: &str) -> Option<Boundary> {
    for &node in leaves {
        let raw = doc.text(node)?;
        let norm = normalize(raw);
        if norm.is_empty() {
            continue;
        }
        if norm.starts_with(remaining) {
            return Some(Boundary::new(node, raw_end(raw, remaining.len())));
        }
        remaining = remaining.strip_prefix(norm.as_str())?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::page;
    use pretty_assertions::assert_eq;

    fn texts(doc: &Document, ranges: &[TextRange]) -> Vec<String> {
        ranges.iter().map(|r| doc.range_text(*r)).collect()
    }

    #[test]
    fn test_finds_single_leaf_match_in_raw_coordinates() {
        let doc = page("<p>The Quick  brown fox</p>");
        let found = locate(&doc, doc.root(), "quick brown", &EngineConfig::default());
        assert_eq!(texts(&doc, &found), vec!["Quick  brown"]);
    }

    #[test]
    fn test_finds_every_occurrence_in_order() {
        let doc = page("<p>echo echo</p><p>Echo</p>");
        let found = locate(&doc, doc.root(), "echo", &EngineConfig::default());
        assert_eq!(found.len(), 3);
        assert_eq!(texts(&doc, &found), vec!["echo", "echo", "Echo"]);
    }

    #[test]
    fn test_overlapping_occurrences_are_all_reported() {
        let doc = page("<p>aaaa</p>");
        let found = locate(&doc, doc.root(), "aaa", &EngineConfig::default());
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_match_across_two_leaves() {
        let doc = page("<p><b>wor</b><i>ld</i></p>");
        let found = locate(&doc, doc.root(), "world", &EngineConfig::default());
        assert_eq!(found.len(), 1);
        assert_ne!(found[0].start.node, found[0].end.node);
        assert_eq!(doc.range_text(found[0]), "world");
    }

    #[test]
    fn test_match_chains_through_whitespace_and_middle_leaves() {
        let doc = page("<p>one tw</p> <p>o thr</p><p>ee four</p>");
        let found = locate(&doc, doc.root(), "two three", &EngineConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(doc.range_text(found[0]), "tw o three");
    }

    #[test]
    fn test_leaf_with_an_inner_match_is_not_continued_into_the_next() {
        // "worl" + "d" would also spell the needle, but the first leaf
        // already matched on its own
        let doc = page("<p><b>worlds worl</b><i>d tail</i></p>");
        let found = locate(&doc, doc.root(), "world", &EngineConfig::default());
        assert_eq!(texts(&doc, &found), vec!["world"]);
        assert_eq!(found[0].start.node, found[0].end.node);
    }

    #[test]
    fn test_failed_continuation_is_not_a_match() {
        let doc = page("<p>wor</p><p>lds apart</p><p>wor</p><p>m</p>");
        let found = locate(&doc, doc.root(), "world", &EngineConfig::default());
        assert_eq!(texts(&doc, &found), vec!["world"]);
    }

    #[test]
    fn test_hidden_and_script_text_is_ignored() {
        let doc = page(
            "<p hidden>needle text</p><script>needle text</script><p>needle text</p>",
        );
        let found = locate(&doc, doc.root(), "needle text", &EngineConfig::default());
        assert_eq!(found.len(), 1);
        let leaf = found[0].start.node;
        assert!(doc.is_content_text(leaf, |el| EngineConfig::default().excludes(el)));
    }

    #[test]
    fn test_no_match_is_empty() {
        let doc = page("<p>nothing to see</p>");
        assert!(locate(&doc, doc.root(), "absent", &EngineConfig::default()).is_empty());
        assert!(locate(&doc, doc.root(), "   ", &EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_occurrences_handles_multibyte() {
        let found: Vec<_> = occurrences("ééé", "éé").collect();
        assert_eq!(found, vec![0, 2]);
    }
}
