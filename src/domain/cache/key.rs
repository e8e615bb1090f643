//! Composite cache key for enrichment results

use serde::{Deserialize, Serialize};

use crate::domain::enrichment::Task;
use crate::domain::text;

/// Unique key for one cached enrichment result.
///
/// A given owner, task, model, and normalized-input hash identify at most
/// one live cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub owner_id: String,
    pub task: Task,
    pub model_name: String,
    pub input_hash: String,
}

impl CacheKey {
    /// Builds a key by fingerprinting the (already normalized) input.
    pub fn for_input(
        owner_id: impl Into<String>,
        task: Task,
        model_name: impl Into<String>,
        input: &str,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            task,
            model_name: model_name.into(),
            input_hash: text::fingerprint(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_key() {
        let a = CacheKey::for_input("user-1", Task::Summarize, "model-a", "hello world");
        let b = CacheKey::for_input("user-1", Task::Summarize, "model-a", "hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_varies_by_component() {
        let base = CacheKey::for_input("user-1", Task::Summarize, "model-a", "hello");
        assert_ne!(
            base,
            CacheKey::for_input("user-2", Task::Summarize, "model-a", "hello")
        );
        assert_ne!(
            base,
            CacheKey::for_input("user-1", Task::Tag, "model-a", "hello")
        );
        assert_ne!(
            base,
            CacheKey::for_input("user-1", Task::Summarize, "model-b", "hello")
        );
        assert_ne!(
            base,
            CacheKey::for_input("user-1", Task::Summarize, "model-a", "hi")
        );
    }
}
