//! Fuzzy matching utilities
//!
//! Edit-distance similarity used by the resolver's last-resort stage.

use strsim::normalized_levenshtein;

/// Result of a fuzzy match with the matched value and score
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<T> {
    pub value: T,
    pub score: f64,
}

/// Calculate similarity score between two strings (0.0 - 1.0)
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Find matches in a list of (reference word, value) candidates
///
/// Returns every candidate scoring at least `cutoff`, best first.
/// Equal scores keep candidate order.
pub fn find_matches<T: Clone>(
    search_term: &str,
    candidates: &[(String, T)],
    cutoff: f64,
) -> Vec<FuzzyMatch<T>> {
    let mut matches: Vec<FuzzyMatch<T>> = candidates
        .iter()
        .filter_map(|(word, value)| {
            let score = similarity(search_term, word);
            (score >= cutoff).then(|| FuzzyMatch {
                value: value.clone(),
                score,
            })
        })
        .collect();

    // Stable sort keeps candidate order for ties
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    matches
}

/// Find the best match above a minimum score
///
/// Returns None if no match meets the cutoff
pub fn find_best_match<T: Clone>(
    search_term: &str,
    candidates: &[(String, T)],
    cutoff: f64,
) -> Option<FuzzyMatch<T>> {
    find_matches(search_term, candidates, cutoff)
        .into_iter()
        .next()
}
