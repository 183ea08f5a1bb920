//! Small string utilities shared by analysis passes.
//!
//! Only pass-agnostic helpers live here: suggestion search and list formatting.

/// Largest edit distance at which a name is offered as "Did you mean".
pub const SUGGESTION_MAX_DISTANCE: usize = 3;

/// Simple edit distance for fuzzy matching (Levenshtein).
///
/// This is optimized for correctness and small inputs (identifiers, variable names),
/// not for very large strings.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();

    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Find the best match from candidates within a maximum edit distance.
///
/// Ties go to the earliest candidate, so results follow declaration order.
pub fn find_similar<'a>(
    name: &str,
    candidates: &[&'a str],
    max_distance: usize,
) -> Option<&'a str> {
    candidates
        .iter()
        .filter(|&&c| c != name)
        .map(|&c| (c, edit_distance(name, c)))
        .filter(|(_, d)| *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

/// `find_similar` with the standard suggestion threshold.
pub fn suggest<'a>(name: &str, candidates: &[&'a str]) -> Option<&'a str> {
    find_similar(name, candidates, SUGGESTION_MAX_DISTANCE)
}

/// Quote and join names for "Available: ..." lists.
pub fn quoted_list<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
