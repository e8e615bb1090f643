//! In-memory enrichment cache implementation using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::{CacheEntry, CacheKey, EnrichmentCache};
use crate::domain::DomainError;

/// Configuration for the in-memory enrichment cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Housekeeping TTL: an upper bound after which moka evicts records
    /// regardless of their own `expires_at`.
    pub housekeeping_ttl: Duration,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            housekeeping_ttl: Duration::from_secs(14 * 24 * 3600),
        }
    }
}

/// Thread-safe in-memory cache keyed by the composite enrichment key.
///
/// Precise expiry is the per-entry `expires_at` check in the read path:
/// an expired record behaves as a miss (and is evicted on sight) even if
/// moka has not yet purged it. Inserts are upserts, so at most one live
/// entry exists per key.
#[derive(Debug)]
pub struct InMemoryEnrichmentCache {
    cache: MokaCache<CacheKey, CacheEntry>,
}

impl InMemoryEnrichmentCache {
    /// Creates a cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.housekeeping_ttl)
            .build();

        Self { cache }
    }

    /// Approximate number of records, including not-yet-purged expired ones.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for InMemoryEnrichmentCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnrichmentCache for InMemoryEnrichmentCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) => {
                if entry.is_expired() {
                    self.cache.remove(key).await;
                    return Ok(None);
                }

                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        self.cache.insert(entry.key.clone(), entry).await;
        Ok(())
    }
}
