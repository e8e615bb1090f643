//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, FallbackConfig, InferenceConfig, LogFormat, LoggingConfig,
    SimilarityConfig,
};
