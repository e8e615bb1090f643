//! Local fallback engine
//!
//! Deterministic, network-free substitutes for every derivation task. Each
//! function here is pure and total: identical normalized input always
//! produces identical output, and nothing blocks or fails. This is what
//! keeps the dedup/search path functioning when the external model is slow,
//! rate-limited, or unreachable.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::domain::text;

/// Default number of fallback tags.
pub const DEFAULT_MAX_TAGS: usize = 5;

/// Character budget for the fallback summary.
const SUMMARY_CHAR_BUDGET: usize = 280;

/// Returned when there is no text to summarize.
pub const NO_SUMMARY_SENTINEL: &str = "No summary available.";

/// Returned when answer generation degrades.
pub const NO_ANSWER_SENTINEL: &str =
    "I'm having trouble connecting to my brain right now. Please try again later.";

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "that", "this", "with", "from", "have", "will", "your", "about", "into",
        "there", "their", "what", "when", "were", "which", "while", "where", "would", "could",
        "should", "than", "been", "being", "http", "https", "www", "com", "org", "net", "you",
        "for", "are", "but", "not", "can", "its", "our", "out",
    ]
    .into_iter()
    .collect()
});

/// Frequency-based tag extraction.
///
/// Tokens of three or more characters outside the stop-word set are counted;
/// the top `max_tags` by descending frequency win, ties broken by first
/// occurrence in the text.
pub fn fallback_tags(normalized: &str, max_tags: usize) -> Vec<String> {
    // First-occurrence order is preserved so the stable sort below breaks
    // frequency ties deterministically.
    let mut counts: Vec<(String, usize)> = Vec::new();

    for token in text::tokenize(normalized) {
        if token.len() <= 2 || STOPWORDS.contains(token.as_str()) {
            continue;
        }

        match counts.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 += 1,
            None => counts.push((token, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(max_tags);
    counts.into_iter().map(|(token, _)| token).collect()
}

/// Extractive summary: the first two sentences, truncated to the character
/// budget with an ellipsis marker when over it.
pub fn fallback_summary(input: &str) -> String {
    let normalized = text::normalize(input);
    if normalized.is_empty() {
        return NO_SUMMARY_SENTINEL.to_string();
    }

    let selected = split_sentences(&normalized)
        .into_iter()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ");

    if selected.chars().count() <= SUMMARY_CHAR_BUDGET {
        selected
    } else {
        let truncated: String = selected.chars().take(SUMMARY_CHAR_BUDGET - 3).collect();
        format!("{}...", truncated)
    }
}

/// Splits normalized text into sentences after terminal punctuation.
fn split_sentences(normalized: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev_terminal = false;

    for (i, c) in normalized.char_indices() {
        if prev_terminal && c.is_whitespace() {
            let sentence = normalized[start..i].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = i;
        }
        prev_terminal = matches!(c, '.' | '!' | '?');
    }

    let tail = normalized[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

/// Deterministic hashed bag-of-words pseudo-embedding.
///
/// Each lowercase token is SHA-256 hashed; four (bucket, sign) pairs are
/// sliced from the hex digest — bucket from an 8-hex-char window modulo the
/// dimension, sign from the parity of a single hex digit — and the signed
/// unit is accumulated into that bucket. The vector is then L2-normalized;
/// an all-zero vector is returned unchanged.
pub fn fallback_embedding(normalized: &str, dimension: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimension];
    if dimension == 0 {
        return vector;
    }

    for token in text::tokenize(normalized) {
        let hash = text::fingerprint(&token);
        let digits = hash.as_bytes();

        for i in 0..4 {
            let window = &hash[i * 8..i * 8 + 8];
            let bucket = u32::from_str_radix(window, 16).unwrap_or(0) as usize % dimension;

            let digit = (digits[32 + i] as char).to_digit(16).unwrap_or(0);
            let sign = if digit % 2 == 0 { 1.0 } else { -1.0 };

            vector[bucket] += sign;
        }
    }

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return vector;
    }

    vector.into_iter().map(|v| v / norm).collect()
}
