//! Deterministic lexical similarity.
//!
//! Stands in for the semantic reranking of candidate snippets: a plain token
//! Jaccard overlap, no learned model involved.

use std::collections::HashSet;

/// Jaccard similarity over lowercase alphanumeric tokens, in [0, 1].
pub fn token_similarity(a: &str, b: &str) -> f32 {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    intersection as f32 / union as f32
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}
