//! Brain Enrichment Pipeline
//!
//! AI enrichment and semantic retrieval for a personal knowledge base:
//! - Derives summaries, topical tags, and embedding vectors from free text
//!   through an external inference endpoint
//! - Stays available when that endpoint is slow, rate-limited, or down by
//!   degrading to a deterministic local fallback engine
//! - Memoizes every resolution (successes and failures) in a keyed,
//!   time-expiring result cache
//! - Powers duplicate detection and semantic search via cosine similarity,
//!   lazily backfilling item embeddings on first access
//!
//! Every result carries a provenance tag so callers can distinguish
//! degraded results from nominal ones.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::item::ItemRepository;
use infrastructure::{
    EnrichmentService, EnrichmentServiceConfig, HfInferenceProvider, HttpClient,
    InMemoryCacheConfig, InMemoryEnrichmentCache, SimilarityService, SimilarityServiceConfig,
    TokioSleeper,
};

/// The wired pipeline: enrichment orchestration plus similarity ranking.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub enrichment: Arc<EnrichmentService>,
    pub similarity: Arc<SimilarityService>,
}

/// Wires the production pipeline: Hugging Face gateway, in-memory result
/// cache, and the caller's item store.
pub fn build_pipeline(config: &AppConfig, items: Arc<dyn ItemRepository>) -> Pipeline {
    let provider = HfInferenceProvider::new(
        HttpClient::new(config.inference.timeout()),
        TokioSleeper,
        config.inference.clone(),
    );

    let cache = InMemoryEnrichmentCache::with_config(InMemoryCacheConfig {
        max_capacity: config.cache.max_capacity,
        housekeeping_ttl: config.cache.ttl(),
    });

    let enrichment = Arc::new(EnrichmentService::new(
        Arc::new(provider),
        Arc::new(cache),
        EnrichmentServiceConfig::from_app_config(config),
    ));

    let similarity = Arc::new(SimilarityService::new(
        enrichment.clone(),
        items,
        SimilarityServiceConfig::from_app_config(config),
    ));

    Pipeline {
        enrichment,
        similarity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::enrichment::Source;
    use infrastructure::InMemoryItemRepository;

    #[tokio::test]
    async fn test_analyze_without_credential_degrades_every_task() {
        // Default config carries no API token, so the gateway fails fast
        // before any network attempt and every task takes the fallback path.
        let pipeline = build_pipeline(&AppConfig::default(), Arc::new(InMemoryItemRepository::new()));

        let input = "React docs guide | A guide for building UIs with React components | https://react.dev | link";
        let analysis = pipeline.enrichment.analyze("user-1", input).await.unwrap();

        assert!(analysis.used_fallback);
        assert_eq!(analysis.summary.source, Source::Fallback);
        assert_eq!(analysis.tags.source, Source::Fallback);
        assert_eq!(analysis.embedding.source, Source::Fallback);

        assert!(analysis.tags.tags.contains(&"react".to_string()));
        assert!(analysis.tags.tags.contains(&"guide".to_string()));
        assert!(analysis.tags.tags.contains(&"building".to_string()));

        assert_eq!(analysis.embedding.embedding.len(), 128);
        let norm = analysis
            .embedding
            .embedding
            .iter()
            .map(|v| v * v)
            .sum::<f32>()
            .sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
