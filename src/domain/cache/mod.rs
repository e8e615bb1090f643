//! Cache domain - result cache record and contract

mod entry;
mod key;
mod repository;

pub use entry::{CacheEntry, CacheStatus};
pub use key::CacheKey;
pub use repository::EnrichmentCache;
