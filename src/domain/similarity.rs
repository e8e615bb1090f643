//! Vector similarity primitives used by duplicate detection and search

use serde::{Deserialize, Serialize};

/// Computes cosine similarity between two vectors.
///
/// Returns 0.0 if either vector is empty, their lengths differ (guards
/// against comparing across embedding-dimension changes), or either norm
/// is zero. A zero vector carries no directional similarity.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// An existing item flagged as a likely duplicate of new content.
///
/// Derived at request time, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    pub item_id: String,
    pub title: String,
    pub link: String,
    /// Cosine similarity against the reference embedding.
    pub score: f32,
}

/// A semantic search result for one of the owner's items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub item_id: String,
    pub title: String,
    pub link: String,
    /// Cosine similarity against the query embedding, rounded for display.
    pub score: f32,
}

/// Rounds a similarity score to four decimal places for presentation.
pub fn round_score(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = vec![0.5, -1.0, 2.0, 0.25];
        let score = cosine_similarity(&v, &v);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors_score_negative_one() {
        let v = vec![1.0, 2.0, -3.0];
        let negated: Vec<f32> = v.iter().map(|x| -x).collect();
        let score = cosine_similarity(&v, &negated);
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = vec![0.0; 4];
        let v = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
    }

    #[test]
    fn test_length_mismatch_scores_zero() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[], &[1.0]), 0.0);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.123_456), 0.1235);
        assert_eq!(round_score(1.0), 1.0);
    }
}
