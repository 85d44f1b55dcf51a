/// Remove all whitespace and lowercase the rest.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Bytes `c` occupies once normalized.
fn folded_len(c: char) -> usize {
    c.to_lowercase().map(char::len_utf8).sum()
}

/// Map a byte offset in `normalize(raw)` to the raw byte offset of the char
/// that produces it. Leading whitespace at that point is skipped.
pub fn raw_start(raw: &str, normalized: usize) -> usize {
    let mut consumed = 0;
    for (i, c) in raw.char_indices() {
        if c.is_whitespace() {
            continue;
        }
        if consumed >= normalized {
            return i;
        }
        consumed += folded_len(c);
    }
    raw.len()
}

/// Map the end of the first `normalized` bytes of `normalize(raw)` to the raw
/// byte offset just past the char that produces the last of them.
pub fn raw_end(raw: &str, normalized: usize) -> usize {
    if normalized == 0 {
        return 0;
    }
    let mut consumed = 0;
    for (i, c) in raw.char_indices() {
        if c.is_whitespace() {
            continue;
        }
        consumed += folded_len(c);
        if consumed >= normalized {
            return i + c.len_utf8();
        }
    }
    raw.len()
}
