fn fold(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows of the classic DP table
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Edit distance (unit-cost insert, delete, substitute) between the
/// lowercased chars of `a` and `b`.
pub fn distance(a: &str, b: &str) -> usize {
    levenshtein(&fold(a), &fold(b))
}

/// `(L - distance) / L` with `L` the longer length; `1.0` for two empty
/// strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = fold(a);
    let b = fold(b);
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    (longest - levenshtein(&a, &b)) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", 0)]
    #[case("abc", "", 3)]
    #[case("", "abc", 3)]
    #[case("kitten", "sitting", 3)]
    #[case("flaw", "lawn", 2)]
    #[case("abc", "xyz", 3)]
    #[case("Same", "sAME", 0)]
    fn test_distance_cases(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(distance(a, b), expected);
    }

    #[test]
    fn test_identical_strings_are_fully_similar() {
        assert_eq!(similarity("anchor", "anchor"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_similarity_follows_distance() {
        let expected = (3 - distance("abc", "xyz")) as f64 / 3.0;
        assert_eq!(similarity("abc", "xyz"), expected);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("abcd", "abce"), 0.75);
    }

    #[test]
    fn test_similarity_against_empty_is_zero() {
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        assert_eq!(similarity("kitten", "sitting"), similarity("sitting", "kitten"));
    }
}
