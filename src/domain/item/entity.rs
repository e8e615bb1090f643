//! Saved knowledge-base items

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of content a saved item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Document,
    Tweet,
    Youtube,
    Link,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Document => "document",
            ItemKind::Tweet => "tweet",
            ItemKind::Youtube => "youtube",
            ItemKind::Link => "link",
        }
    }
}

/// One item a user has saved to their knowledge base.
///
/// The embedding is owned by the item it was computed for: it is recomputed
/// whole (never incrementally updated) when the underlying text changes,
/// and persisted back so later searches skip recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedItem {
    pub id: String,
    pub owner_id: String,
    pub kind: ItemKind,
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub embedding: Option<Vec<f32>>,
}

impl SavedItem {
    pub fn new(
        owner_id: impl Into<String>,
        kind: ItemKind,
        title: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            kind,
            title: title.into(),
            link: link.into(),
            description: None,
            tags: Vec::new(),
            summary: None,
            embedding: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// The text an item's embedding is derived from: its non-empty
    /// title/description/link/kind fields joined with " | ".
    pub fn embedding_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(4);

        if !self.title.is_empty() {
            parts.push(&self.title);
        }
        if let Some(ref description) = self.description {
            if !description.is_empty() {
                parts.push(description);
            }
        }
        if !self.link.is_empty() {
            parts.push(&self.link);
        }
        parts.push(self.kind.as_str());

        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text_joins_fields() {
        let item = SavedItem::new("user-1", ItemKind::Link, "React docs guide", "https://react.dev")
            .with_description("A guide for building UIs with React components");

        assert_eq!(
            item.embedding_text(),
            "React docs guide | A guide for building UIs with React components | https://react.dev | link"
        );
    }

    #[test]
    fn test_embedding_text_skips_empty_fields() {
        let item = SavedItem::new("user-1", ItemKind::Document, "Notes", "");
        assert_eq!(item.embedding_text(), "Notes | document");
    }

    #[test]
    fn test_new_item_has_no_embedding() {
        let item = SavedItem::new("user-1", ItemKind::Link, "t", "l");
        assert!(item.embedding.is_none());
        assert!(!item.id.is_empty());
    }
}
