//! Search infrastructure - duplicate detection and semantic ranking

mod service;

pub use service::{SimilarityService, SimilarityServiceConfig};
