//! Word extraction
//!
//! A token is a maximal run of ASCII letters at least [`MIN_WORD_LEN`] long.
//! Everything else separates tokens and is dropped. Case is preserved.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Shortest run of letters that counts as a word
pub const MIN_WORD_LEN: usize = 3;

static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("[a-zA-Z]{{{},}}", MIN_WORD_LEN)).expect("word pattern is valid")
});

/// Extract the set of distinct words in `text`.
///
/// Repeated occurrences collapse to one entry, so a word contributes to a
/// document's counts at most once. Matching is exact and case-sensitive.
pub fn extract_words(text: &str) -> HashSet<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
