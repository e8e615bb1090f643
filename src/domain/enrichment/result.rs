//! Enrichment result types with provenance

use serde::{Deserialize, Serialize};

/// Where a result came from: the external model or the local fallback engine.
///
/// Surfaced to callers so degraded-quality results are distinguishable from
/// nominal ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    External,
    Fallback,
}

impl Source {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Source::Fallback)
    }
}

/// A short summary of a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub source: Source,
}

/// Suggested topical tags for a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagsResult {
    pub tags: Vec<String>,
    pub source: Source,
}

/// A fixed-length embedding vector for a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResult {
    pub embedding: Vec<f32>,
    pub source: Source,
}

/// A generated answer grounded in the caller-supplied context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub source: Source,
}

/// The joined output of the three independent derivation sub-tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub summary: SummaryResult,
    pub tags: TagsResult,
    pub embedding: EmbeddingResult,
    /// True if any of the three sub-tasks degraded to the fallback engine,
    /// so callers can warn users of reduced quality.
    pub used_fallback: bool,
}

impl ContentAnalysis {
    pub fn new(summary: SummaryResult, tags: TagsResult, embedding: EmbeddingResult) -> Self {
        let used_fallback = summary.source.is_fallback()
            || tags.source.is_fallback()
            || embedding.source.is_fallback();

        Self {
            summary,
            tags,
            embedding,
            used_fallback,
        }
    }
}
