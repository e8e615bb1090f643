//! Item store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::SavedItem;
use crate::domain::DomainError;

/// Narrow interface onto the external document store holding saved items.
///
/// The pipeline only ever needs "find by id", "find by owner", and "update
/// the embedding field"; account management and the rest of item CRUD live
/// outside this crate.
#[async_trait]
pub trait ItemRepository: Send + Sync + Debug {
    /// Finds one of the owner's items by id.
    async fn find(&self, owner_id: &str, item_id: &str) -> Result<Option<SavedItem>, DomainError>;

    /// Lists all items belonging to the owner.
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<SavedItem>, DomainError>;

    /// Persists a freshly computed embedding onto an item.
    async fn set_embedding(
        &self,
        owner_id: &str,
        item_id: &str,
        embedding: Vec<f32>,
    ) -> Result<(), DomainError>;
}
