//! In-memory item store implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::item::{ItemRepository, SavedItem};
use crate::domain::DomainError;

/// In-memory item store.
///
/// Stands in for the external document store in tests and single-process
/// deployments; production adapters implement [`ItemRepository`] over the
/// real storage engine.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: RwLock<HashMap<String, SavedItem>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an item, returning its id.
    pub fn insert(&self, item: SavedItem) -> String {
        let id = item.id.clone();
        self.items.write().unwrap().insert(id.clone(), item);
        id
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn find(&self, owner_id: &str, item_id: &str) -> Result<Option<SavedItem>, DomainError> {
        let items = self
            .items
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(items
            .get(item_id)
            .filter(|item| item.owner_id == owner_id)
            .cloned())
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<SavedItem>, DomainError> {
        let items = self
            .items
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut owned: Vec<SavedItem> = items
            .values()
            .filter(|item| item.owner_id == owner_id)
            .cloned()
            .collect();

        // Deterministic enumeration order for stable tie-breaking downstream.
        owned.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(owned)
    }

    async fn set_embedding(
        &self,
        owner_id: &str,
        item_id: &str,
        embedding: Vec<f32>,
    ) -> Result<(), DomainError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        match items.get_mut(item_id).filter(|item| item.owner_id == owner_id) {
            Some(item) => {
                item.embedding = Some(embedding);
                Ok(())
            }
            None => Err(DomainError::storage(format!(
                "Item '{}' not found for owner",
                item_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::ItemKind;

    #[tokio::test]
    async fn test_find_scopes_to_owner() {
        let repo = InMemoryItemRepository::new();
        let id = repo.insert(SavedItem::new("user-1", ItemKind::Link, "t", "l"));

        assert!(repo.find("user-1", &id).await.unwrap().is_some());
        assert!(repo.find("user-2", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_owner_filters_and_sorts() {
        let repo = InMemoryItemRepository::new();
        repo.insert(SavedItem::new("user-1", ItemKind::Link, "a", "l"));
        repo.insert(SavedItem::new("user-1", ItemKind::Link, "b", "l"));
        repo.insert(SavedItem::new("user-2", ItemKind::Link, "c", "l"));

        let items = repo.list_for_owner("user-1").await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.windows(2).all(|w| w[0].id <= w[1].id));
    }

    #[tokio::test]
    async fn test_set_embedding_persists() {
        let repo = InMemoryItemRepository::new();
        let id = repo.insert(SavedItem::new("user-1", ItemKind::Link, "t", "l"));

        repo.set_embedding("user-1", &id, vec![1.0, 2.0]).await.unwrap();

        let item = repo.find("user-1", &id).await.unwrap().unwrap();
        assert_eq!(item.embedding, Some(vec![1.0, 2.0]));
    }

    #[tokio::test]
    async fn test_set_embedding_unknown_item_is_storage_error() {
        let repo = InMemoryItemRepository::new();
        let result = repo.set_embedding("user-1", "missing", vec![1.0]).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
