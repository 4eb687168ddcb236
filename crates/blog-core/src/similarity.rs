//! Trigram similarity, matching PostgreSQL's `pg_trgm` `similarity()`.
//!
//! Text is lowercased and split into words on non-alphanumeric characters.
//! Each word is padded with two spaces in front and one behind, and every
//! three-character window becomes a trigram. The similarity of two strings
//! is the size of the shared trigram set divided by the size of the union.

use std::collections::HashSet;

/// The set of trigrams of `text`.
pub fn trigrams(text: &str) -> HashSet<[char; 3]> {
    let mut set = HashSet::new();

    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = "  "
            .chars()
            .chain(word.chars().flat_map(char::to_lowercase))
            .chain(std::iter::once(' '))
            .collect();

        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }

    set
}

/// Trigram similarity of `a` and `b`, in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;

    shared as f64 / union as f64
}
