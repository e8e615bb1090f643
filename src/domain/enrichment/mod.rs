//! Enrichment domain - derivation tasks, results, and the provider port

mod provider;
mod result;
mod task;

pub use provider::InferenceProvider;
pub use result::{AnswerResult, ContentAnalysis, EmbeddingResult, Source, SummaryResult, TagsResult};
pub use task::{build_label_set, Task, COMMON_TAG_LABELS, MAX_CANDIDATE_LABELS};

#[cfg(test)]
pub use provider::mock::MockInferenceProvider;
