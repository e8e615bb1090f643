//! Domain layer - core types, contracts, and pure computations

pub mod cache;
pub mod enrichment;
pub mod error;
pub mod item;
pub mod similarity;
pub mod text;

pub use cache::{CacheEntry, CacheKey, CacheStatus, EnrichmentCache};
pub use enrichment::{
    build_label_set, AnswerResult, ContentAnalysis, EmbeddingResult, InferenceProvider, Source,
    SummaryResult, TagsResult, Task,
};
pub use error::DomainError;
pub use item::{ItemKind, ItemRepository, SavedItem};
pub use similarity::{cosine_similarity, DuplicateCandidate, SearchHit};
