//! Candidate symptom phrases from free text.
//!
//! A message is lowercased, stripped of everything except `[a-z0-9]` and
//! whitespace, and split into words. Single-character words are dropped. The
//! candidates are the remaining words plus every adjacent pair of them, longest
//! first so that callers taking the first hit prefer phrases over their parts.
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static NON_TOKEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("valid regex"));

/// Lowercase `text` and replace each character outside `[a-z0-9]` and
/// whitespace with a space. Applying it twice changes nothing.
pub fn normalize(text: &str) -> String {
    NON_TOKEN_CHARS
        .replace_all(&text.to_lowercase(), " ")
        .into_owned()
}

/// Normalized words longer than one character, in message order.
pub fn words(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .filter(|w| w.len() > 1)
        .map(str::to_string)
        .collect()
}

/// Unigrams and adjacent-word bigrams of `message`, without duplicates.
///
/// Sorted by descending length; equal lengths are in ascending lexicographic
/// order so the output is identical across runs.
pub fn extract_tokens(message: &str) -> Vec<String> {
    let words = words(message);

    let mut tokens: BTreeSet<String> = words.iter().cloned().collect();
    for pair in words.windows(2) {
        tokens.insert(format!("{} {}", pair[0], pair[1]));
    }

    let mut tokens: Vec<String> = tokens.into_iter().collect();
    tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    tokens
}
