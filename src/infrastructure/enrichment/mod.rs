//! Enrichment infrastructure - the cache/gateway/fallback orchestrator

mod service;

pub use service::{EnrichmentService, EnrichmentServiceConfig};
