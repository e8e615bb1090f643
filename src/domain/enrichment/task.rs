//! Derivation task identifiers and the curated tag label set

use serde::{Deserialize, Serialize};

/// A derivation task the pipeline can resolve for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Summarize,
    Tag,
    Embed,
    Generate,
}

impl Task {
    /// Stable wire name, used in cache keys and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Summarize => "summarization",
            Task::Tag => "tagging",
            Task::Embed => "embedding",
            Task::Generate => "generation",
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Curated candidate labels for zero-shot tag classification.
///
/// Callers may extend these with an item's existing tags; the combined set
/// is deduplicated and capped by [`build_label_set`].
pub const COMMON_TAG_LABELS: &[&str] = &[
    "productivity",
    "learning",
    "programming",
    "frontend",
    "backend",
    "react",
    "nodejs",
    "mongodb",
    "database",
    "design",
    "startup",
    "business",
    "career",
    "ai",
    "machine learning",
    "devops",
    "security",
    "finance",
    "health",
    "news",
];

/// Maximum number of candidate labels sent to the classifier.
pub const MAX_CANDIDATE_LABELS: usize = 30;

/// Merges the curated labels with caller-supplied existing tags.
///
/// Existing tags are lowercased; duplicates are removed preserving first
/// occurrence; the result is capped at [`MAX_CANDIDATE_LABELS`].
pub fn build_label_set(existing_tags: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();

    for label in COMMON_TAG_LABELS
        .iter()
        .map(|l| l.to_string())
        .chain(existing_tags.iter().filter(|t| !t.is_empty()).map(|t| t.to_lowercase()))
    {
        if !labels.contains(&label) {
            labels.push(label);
        }
        if labels.len() == MAX_CANDIDATE_LABELS {
            break;
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_wire_names() {
        assert_eq!(Task::Summarize.as_str(), "summarization");
        assert_eq!(Task::Tag.as_str(), "tagging");
        assert_eq!(Task::Embed.as_str(), "embedding");
        assert_eq!(Task::Generate.as_str(), "generation");
    }

    #[test]
    fn test_label_set_merges_and_lowercases() {
        let labels = build_label_set(&["Rust".to_string(), "react".to_string()]);
        assert!(labels.contains(&"rust".to_string()));
        // "react" is already in the curated list and must not duplicate.
        assert_eq!(labels.iter().filter(|l| l.as_str() == "react").count(), 1);
    }

    #[test]
    fn test_label_set_is_capped() {
        let extra: Vec<String> = (0..50).map(|i| format!("tag{}", i)).collect();
        let labels = build_label_set(&extra);
        assert_eq!(labels.len(), MAX_CANDIDATE_LABELS);
    }

    #[test]
    fn test_label_set_skips_empty_tags() {
        let labels = build_label_set(&[String::new()]);
        assert_eq!(labels.len(), COMMON_TAG_LABELS.len());
    }
}
