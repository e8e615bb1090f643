//! Cache infrastructure - result cache adapters

mod in_memory;

pub use in_memory::{InMemoryCacheConfig, InMemoryEnrichmentCache};
