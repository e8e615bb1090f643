//! Inference provider trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Port for the external model-serving endpoint.
///
/// Implementations return typed failures only — never a partial or garbled
/// result. The orchestrator decides whether a failure degrades to the
/// fallback engine.
#[async_trait]
pub trait InferenceProvider: Send + Sync + Debug {
    /// Generates a short summary for the given text.
    async fn summarize(&self, text: &str) -> Result<String, DomainError>;

    /// Classifies the text against the candidate labels, returning the
    /// selected lowercase labels ordered by descending confidence.
    async fn classify(&self, text: &str, labels: &[String]) -> Result<Vec<String>, DomainError>;

    /// Computes an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Generates a free-form answer from the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;

    /// Model name used for a task, recorded in cache keys.
    fn model_name(&self, task: super::Task) -> &str;
}
