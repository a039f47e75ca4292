//! Query normalization for book lookups
//!
//! Turns a raw (title, authors) pair into the canonical key used by the
//! book cache. Pure string processing, no I/O.

/// Words dropped from normalized terms
const STOP_WORDS: &[&str] = &["the", "a", "an", "and"];

/// Normalize a single term: lowercase, strip punctuation, drop stop words,
/// collapse whitespace.
fn normalize_term(term: &str) -> String {
    let cleaned: String = term
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the canonical lookup key for a (title, authors) query.
///
/// Authors are normalized individually and sorted before joining, so the
/// key is independent of author order. Empty or missing authors produce a
/// title-only key segment.
pub fn normalize(title: &str, authors: &[String]) -> String {
    let mut normalized_authors: Vec<String> = authors
        .iter()
        .map(|a| normalize_term(a))
        .filter(|a| !a.is_empty())
        .collect();
    normalized_authors.sort();

    format!("{}|{}", normalize_term(title), normalized_authors.join(","))
}
