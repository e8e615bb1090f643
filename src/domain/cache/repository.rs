//! Enrichment cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::{CacheEntry, CacheKey};
use crate::domain::DomainError;

/// Keyed, time-expiring store of previously computed enrichment results.
///
/// The read path must treat entries past their `expires_at` as a miss even
/// if the record has not yet been physically purged; physical cleanup is a
/// housekeeping concern of the implementation.
///
/// This is the pipeline's only shared mutable resource. `put` is an atomic
/// upsert keyed by the composite [`CacheKey`], so concurrent writes for the
/// same key commute (last write wins; payloads for identical inputs are
/// expected to be equivalent).
#[async_trait]
pub trait EnrichmentCache: Send + Sync + Debug {
    /// Looks up a live entry for the key. Expired entries behave as a miss.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, DomainError>;

    /// Upserts the entry: a new write for the same key replaces the old
    /// value, never duplicates it.
    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError>;
}
