//! Character-level sequence alignment ratio.
//!
//! Ratio = 2·M / (len(a) + len(b)), where M is the total length of the
//! longest matching blocks found by recursively splitting around the longest
//! common substring. Character-level, not token-level: it catches
//! morphological variants ("kidulting" vs "kidults") that substring rules
//! miss.

/// Similarity ratio in [0.0, 1.0]. 1.0 means identical strings.
pub fn sequence_ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = matching_chars(&a, &b);
    2.0 * matches as f32 / total as f32
}

/// Total characters covered by matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// The earliest longest common substring of `a` and `b` as (start_a, start_b, len).
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // lengths[j] = length of the common suffix ending at a[i-1], b[j-1].
    let mut lengths = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        let mut prev = 0;
        for j in 0..b.len() {
            let current = lengths[j + 1];
            lengths[j + 1] = if a[i] == b[j] { prev + 1 } else { 0 };
            if lengths[j + 1] > best.2 {
                best = (i + 1 - lengths[j + 1], j + 1 - lengths[j + 1], lengths[j + 1]);
            }
            prev = current;
        }
    }
    best
}
