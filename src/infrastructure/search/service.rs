//! Duplicate detection and semantic search over a user's saved items

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::item::{ItemRepository, SavedItem};
use crate::domain::similarity::{cosine_similarity, round_score, DuplicateCandidate, SearchHit};
use crate::domain::DomainError;
use crate::infrastructure::enrichment::EnrichmentService;

/// Similarity ranking tunables
#[derive(Debug, Clone)]
pub struct SimilarityServiceConfig {
    /// Minimum score at which a candidate counts as a duplicate.
    pub duplicate_threshold: f32,
    /// Maximum duplicates reported per check.
    pub max_duplicates: usize,
    /// Hard cap on semantic search result counts.
    pub search_limit: usize,
    /// Worker bound for lazy embedding backfill.
    pub backfill_concurrency: usize,
}

impl Default for SimilarityServiceConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: 0.88,
            max_duplicates: 5,
            search_limit: 50,
            backfill_concurrency: 4,
        }
    }
}

impl SimilarityServiceConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            duplicate_threshold: config.similarity.duplicate_threshold,
            max_duplicates: config.similarity.max_duplicates,
            search_limit: config.similarity.search_limit,
            backfill_concurrency: config.similarity.backfill_concurrency.max(1),
        }
    }
}

/// Ranks a user's items against a reference embedding.
///
/// Items lacking a stored embedding get one computed through the
/// enrichment pipeline and persisted on first access (lazy backfill).
/// Backfill runs with bounded concurrency, and an in-flight map keyed by
/// item id ensures concurrent backfills for the same item converge on a
/// single computation instead of racing two writes.
#[derive(Debug)]
pub struct SimilarityService {
    enrichment: Arc<EnrichmentService>,
    items: Arc<dyn ItemRepository>,
    config: SimilarityServiceConfig,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SimilarityService {
    pub fn new(
        enrichment: Arc<EnrichmentService>,
        items: Arc<dyn ItemRepository>,
        config: SimilarityServiceConfig,
    ) -> Self {
        Self {
            enrichment,
            items,
            config,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Flags existing items that look like duplicates of the given content.
    ///
    /// Candidates scoring at or above the configured threshold are returned
    /// in descending score order, capped at `max_duplicates`.
    pub async fn find_duplicates(
        &self,
        owner_id: &str,
        content_text: &str,
        exclude_item_id: Option<&str>,
    ) -> Result<Vec<DuplicateCandidate>, DomainError> {
        let reference = self.enrichment.embedding(owner_id, content_text).await?;
        let mut scored = self
            .scored_items(owner_id, &reference.embedding, exclude_item_id)
            .await?;

        scored.retain(|(_, score)| *score >= self.config.duplicate_threshold);
        sort_descending(&mut scored);
        scored.truncate(self.config.max_duplicates);

        Ok(scored
            .into_iter()
            .map(|(item, score)| DuplicateCandidate {
                item_id: item.id,
                title: item.title,
                link: item.link,
                score,
            })
            .collect())
    }

    /// Ranks all of the owner's items against the query by similarity.
    ///
    /// The result count is capped at the configured search limit; equal
    /// scores keep the store's enumeration order (stable sort).
    pub async fn semantic_search(
        &self,
        owner_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, DomainError> {
        let reference = self.enrichment.embedding(owner_id, query).await?;
        let mut scored = self
            .scored_items(owner_id, &reference.embedding, None)
            .await?;

        sort_descending(&mut scored);
        scored.truncate(limit.min(self.config.search_limit));

        Ok(scored
            .into_iter()
            .map(|(item, score)| SearchHit {
                item_id: item.id,
                title: item.title,
                link: item.link,
                score: round_score(score),
            })
            .collect())
    }

    /// Scores every candidate item against the reference embedding,
    /// backfilling missing embeddings with bounded concurrency. Order of
    /// the returned pairs follows the store's enumeration order.
    async fn scored_items(
        &self,
        owner_id: &str,
        reference: &[f32],
        exclude_item_id: Option<&str>,
    ) -> Result<Vec<(SavedItem, f32)>, DomainError> {
        let items = self.items.list_for_owner(owner_id).await?;

        stream::iter(
            items
                .into_iter()
                .filter(|item| exclude_item_id != Some(item.id.as_str())),
        )
        .map(|item| async move {
            let embedding = self.resolve_embedding(&item).await?;
            let score = cosine_similarity(reference, &embedding);
            Ok::<_, DomainError>((item, score))
        })
        // `buffered` (not `buffer_unordered`) keeps enumeration order for
        // the stable tie-break downstream.
        .buffered(self.config.backfill_concurrency)
        .try_collect()
        .await
    }

    /// Returns the item's embedding, computing and persisting it if absent.
    async fn resolve_embedding(&self, item: &SavedItem) -> Result<Vec<f32>, DomainError> {
        if let Some(ref embedding) = item.embedding {
            return Ok(embedding.clone());
        }

        let lock = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight
                .entry(item.id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        let _guard = lock.lock().await;
        let result = self.backfill(item).await;
        self.in_flight.lock().await.remove(&item.id);

        result
    }

    async fn backfill(&self, item: &SavedItem) -> Result<Vec<f32>, DomainError> {
        // A concurrent winner may have persisted the embedding while this
        // task waited on the per-item lock.
        if let Some(fresh) = self.items.find(&item.owner_id, &item.id).await? {
            if let Some(embedding) = fresh.embedding {
                return Ok(embedding);
            }
        }

        let computed = self
            .enrichment
            .embedding(&item.owner_id, &item.embedding_text())
            .await?;
        self.items
            .set_embedding(&item.owner_id, &item.id, computed.embedding.clone())
            .await?;

        debug!(item_id = %item.id, source = ?computed.source, "backfilled item embedding");
        Ok(computed.embedding)
    }
}

fn sort_descending(scored: &mut [(SavedItem, f32)]) {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrichment::MockInferenceProvider;
    use crate::domain::item::{ItemKind, SavedItem};
    use crate::infrastructure::cache::InMemoryEnrichmentCache;
    use crate::infrastructure::enrichment::EnrichmentServiceConfig;
    use crate::infrastructure::item::InMemoryItemRepository;

    /// Pipeline wired for offline operation: every embedding resolves
    /// through the deterministic fallback engine.
    fn offline_service(repo: Arc<InMemoryItemRepository>) -> SimilarityService {
        let enrichment = Arc::new(EnrichmentService::new(
            Arc::new(MockInferenceProvider::new().with_error("offline")),
            Arc::new(InMemoryEnrichmentCache::new()),
            EnrichmentServiceConfig::default(),
        ));

        SimilarityService::new(enrichment, repo, SimilarityServiceConfig::default())
    }

    fn react_item(owner: &str) -> SavedItem {
        SavedItem::new(owner, ItemKind::Link, "React docs guide", "https://react.dev")
            .with_description("A guide for building UIs with React components")
    }

    #[tokio::test]
    async fn test_identical_text_flags_as_duplicate() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let existing = react_item("user-1");
        let existing_text = existing.embedding_text();
        let existing_id = repo.insert(existing);

        let service = offline_service(repo.clone());
        let duplicates = service
            .find_duplicates("user-1", &existing_text, None)
            .await
            .unwrap();

        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].item_id, existing_id);
        assert!((duplicates[0].score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_unrelated_text_is_not_a_duplicate() {
        let repo = Arc::new(InMemoryItemRepository::new());
        repo.insert(react_item("user-1"));

        let service = offline_service(repo.clone());
        let duplicates = service
            .find_duplicates("user-1", "Sourdough bread baking temperatures", None)
            .await
            .unwrap();

        assert!(duplicates.is_empty());
    }

    #[tokio::test]
    async fn test_exclude_id_skips_the_item_itself() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let existing = react_item("user-1");
        let text = existing.embedding_text();
        let id = repo.insert(existing);

        let service = offline_service(repo.clone());
        let duplicates = service
            .find_duplicates("user-1", &text, Some(&id))
            .await
            .unwrap();

        assert!(duplicates.is_empty());
    }

    #[tokio::test]
    async fn test_backfill_persists_missing_embeddings() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let id = repo.insert(react_item("user-1"));

        let service = offline_service(repo.clone());
        service.semantic_search("user-1", "react", 10).await.unwrap();

        let item = repo.find("user-1", &id).await.unwrap().unwrap();
        let embedding = item.embedding.expect("embedding should be persisted");
        assert_eq!(embedding.len(), 128);
    }

    #[tokio::test]
    async fn test_stored_embeddings_are_reused() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let item = react_item("user-1");
        let stored_text = item.embedding_text();
        repo.insert(item);

        let provider = Arc::new(MockInferenceProvider::new().with_error("offline"));
        let enrichment = Arc::new(EnrichmentService::new(
            provider.clone(),
            Arc::new(InMemoryEnrichmentCache::new()),
            EnrichmentServiceConfig::default(),
        ));
        let service = SimilarityService::new(
            enrichment,
            repo.clone(),
            SimilarityServiceConfig::default(),
        );

        service.semantic_search("user-1", &stored_text, 10).await.unwrap();
        let after_first = provider.call_count();

        service.semantic_search("user-1", &stored_text, 10).await.unwrap();

        // Query embedding comes from the cache; item embedding from the
        // store. No new provider attempts on the second search.
        assert_eq!(provider.call_count(), after_first);
    }

    #[tokio::test]
    async fn test_search_ranks_closest_first_and_respects_limit() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let close = react_item("user-1");
        let close_text = close.embedding_text();
        let close_id = repo.insert(close);
        repo.insert(
            SavedItem::new("user-1", ItemKind::Link, "Sourdough recipes", "https://bread.example")
                .with_description("Baking temperatures and hydration"),
        );
        repo.insert(
            SavedItem::new("user-1", ItemKind::Link, "Jazz history", "https://jazz.example"),
        );

        let service = offline_service(repo.clone());
        let hits = service.semantic_search("user-1", &close_text, 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].item_id, close_id);
        assert!((hits[0].score - 1.0).abs() < 1e-4);
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn test_search_limit_is_capped() {
        let repo = Arc::new(InMemoryItemRepository::new());
        repo.insert(react_item("user-1"));

        let service = offline_service(repo.clone());
        let hits = service
            .semantic_search("user-1", "react", usize::MAX)
            .await
            .unwrap();

        assert!(hits.len() <= 50);
    }

    #[tokio::test]
    async fn test_concurrent_searches_converge_on_one_embedding() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let id = repo.insert(react_item("user-1"));

        let service = Arc::new(offline_service(repo.clone()));

        let a = {
            let service = service.clone();
            tokio::spawn(async move { service.semantic_search("user-1", "react", 10).await })
        };
        let b = {
            let service = service.clone();
            tokio::spawn(async move { service.semantic_search("user-1", "react", 10).await })
        };

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert_eq!(a[0].score, b[0].score);

        let item = repo.find("user-1", &id).await.unwrap().unwrap();
        assert!(item.embedding.is_some());
    }
}
