//! Infrastructure layer - adapters behind the domain's ports

pub mod cache;
pub mod enrichment;
pub mod fallback;
pub mod http_client;
pub mod inference;
pub mod item;
pub mod logging;
pub mod search;

pub use cache::{InMemoryCacheConfig, InMemoryEnrichmentCache};
pub use enrichment::{EnrichmentService, EnrichmentServiceConfig};
pub use http_client::{HttpClient, HttpClientTrait, HttpResponse};
pub use inference::{HfInferenceProvider, Sleeper, TokioSleeper};
pub use item::InMemoryItemRepository;
pub use logging::init_logging;
pub use search::{SimilarityService, SimilarityServiceConfig};
