use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub inference: InferenceConfig,
    pub cache: CacheConfig,
    pub similarity: SimilarityConfig,
    pub fallback: FallbackConfig,
    pub logging: LoggingConfig,
}

/// External inference endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    /// Bearer credential; absence makes every gateway call a hard failure
    /// before any network attempt, which the orchestrator degrades to the
    /// fallback engine.
    pub api_token: Option<String>,
    pub summary_model: String,
    pub tag_model: String,
    pub embedding_model: String,
    pub generation_model: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_hours: u64,
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Minimum cosine similarity at which two items count as duplicates.
    pub duplicate_threshold: f32,
    pub max_duplicates: usize,
    /// Hard cap on semantic search result counts.
    pub search_limit: usize,
    /// Worker bound for lazy embedding backfill during search and dedup.
    pub backfill_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub embedding_dimension: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.huggingface.co/hf-inference/models".to_string(),
            api_token: None,
            summary_model: "facebook/bart-large-cnn".to_string(),
            tag_model: "facebook/bart-large-mnli".to_string(),
            embedding_model: "BAAI/bge-small-en-v1.5".to_string(),
            generation_model: "mistralai/Mistral-7B-Instruct-v0.3".to_string(),
            timeout_ms: 20_000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24 * 14,
            max_capacity: 10_000,
        }
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: 0.88,
            max_duplicates: 5,
            search_limit: 50,
            backfill_concurrency: 4,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            embedding_dimension: 128,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_hours * 3600)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("BRAIN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(
            config.inference.base_url,
            "https://router.huggingface.co/hf-inference/models"
        );
        assert!(config.inference.api_token.is_none());
        assert_eq!(config.inference.timeout_ms, 20_000);
        assert_eq!(config.cache.ttl_hours, 336);
        assert_eq!(config.similarity.duplicate_threshold, 0.88);
        assert_eq!(config.similarity.search_limit, 50);
        assert_eq!(config.fallback.embedding_dimension, 128);
    }

    #[test]
    fn test_ttl_conversion() {
        let config = CacheConfig {
            ttl_hours: 2,
            max_capacity: 10,
        };
        assert_eq!(config.ttl(), std::time::Duration::from_secs(7200));
    }
}
