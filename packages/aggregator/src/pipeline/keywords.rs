//! Keyword tagging against a fixed skills vocabulary.

use std::collections::BTreeSet;

/// Controlled vocabulary, in match order.
pub const VOCABULARY: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "node",
    "sql",
    "mongodb",
    "aws",
    "docker",
    "kubernetes",
    "agile",
    "scrum",
    "api",
    "rest",
];

/// Upper bound on keywords attached to one listing.
pub const MAX_KEYWORDS: usize = 10;

/// Tag `text` with the vocabulary terms it contains.
///
/// Matching is a case-insensitive substring test. When more than
/// [`MAX_KEYWORDS`] terms match, the earliest ones in [`VOCABULARY`] order
/// are kept. The result is a set; callers must not rely on its order.
pub fn tag(text: &str) -> BTreeSet<String> {
    let haystack = text.to_lowercase();

    VOCABULARY
        .iter()
        .copied()
        .filter(|term| haystack.contains(*term))
        .take(MAX_KEYWORDS)
        .map(|term| term.to_string())
        .collect()
}
