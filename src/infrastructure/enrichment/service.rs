//! Enrichment orchestration service

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::config::AppConfig;
use crate::domain::cache::{CacheEntry, CacheKey, CacheStatus, EnrichmentCache};
use crate::domain::enrichment::{
    build_label_set, AnswerResult, ContentAnalysis, EmbeddingResult, InferenceProvider, Source,
    SummaryResult, TagsResult, Task,
};
use crate::domain::text;
use crate::domain::DomainError;
use crate::infrastructure::fallback;

/// Orchestrator tunables
#[derive(Debug, Clone)]
pub struct EnrichmentServiceConfig {
    /// How long resolved results (including memoized failures) stay live.
    pub cache_ttl: Duration,
    /// Dimension of the deterministic fallback embedding.
    pub embedding_dimension: usize,
}

impl Default for EnrichmentServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(14 * 24 * 3600),
            embedding_dimension: 128,
        }
    }
}

impl EnrichmentServiceConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            cache_ttl: config.cache.ttl(),
            embedding_dimension: config.fallback.embedding_dimension,
        }
    }
}

/// Per-request control flow for every derivation task:
/// normalize, fingerprint, cache lookup, then the inference gateway, then
/// the fallback engine. Gateway failures of any degradation kind never
/// propagate — the pipeline only degrades, it does not fail — while cache
/// and storage errors do.
#[derive(Debug)]
pub struct EnrichmentService {
    provider: Arc<dyn InferenceProvider>,
    cache: Arc<dyn EnrichmentCache>,
    config: EnrichmentServiceConfig,
}

impl EnrichmentService {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        cache: Arc<dyn EnrichmentCache>,
        config: EnrichmentServiceConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    /// Summarizes the text, serving from cache when possible.
    pub async fn summarize(&self, owner_id: &str, input: &str) -> Result<SummaryResult, DomainError> {
        let normalized = text::normalize(input);
        let key = self.key(owner_id, Task::Summarize, &normalized);

        if let Some(cached) = self.cached::<SummaryResult>(&key).await? {
            return Ok(cached);
        }

        match self.provider.summarize(&normalized).await {
            Ok(summary) => {
                let result = SummaryResult {
                    summary,
                    source: Source::External,
                };
                self.store(key, &normalized, &result, CacheStatus::Ok).await?;
                Ok(result)
            }
            Err(e) if e.is_degradation() => {
                warn!(task = %Task::Summarize, error = %e, "degrading to fallback");
                let result = SummaryResult {
                    summary: fallback::fallback_summary(&normalized),
                    source: Source::Fallback,
                };
                self.store(key, &normalized, &result, CacheStatus::Error).await?;
                Ok(result)
            }
            Err(e) => Err(e),
        }
    }

    /// Suggests tags for the text, merging the curated label set with the
    /// caller's existing tags. The label set participates in the cache key
    /// so a changed set is a different input.
    pub async fn suggest_tags(
        &self,
        owner_id: &str,
        input: &str,
        existing_tags: &[String],
    ) -> Result<TagsResult, DomainError> {
        let normalized = text::normalize(input);
        let labels = build_label_set(existing_tags);
        let cache_input = format!("{}::{}", normalized, labels.join(","));
        let key = self.key(owner_id, Task::Tag, &cache_input);

        if let Some(cached) = self.cached::<TagsResult>(&key).await? {
            return Ok(cached);
        }

        match self.provider.classify(&normalized, &labels).await {
            Ok(tags) => {
                let result = TagsResult {
                    tags,
                    source: Source::External,
                };
                self.store(key, &cache_input, &result, CacheStatus::Ok).await?;
                Ok(result)
            }
            Err(e) if e.is_degradation() => {
                warn!(task = %Task::Tag, error = %e, "degrading to fallback");
                let result = TagsResult {
                    tags: fallback::fallback_tags(&normalized, fallback::DEFAULT_MAX_TAGS),
                    source: Source::Fallback,
                };
                self.store(key, &cache_input, &result, CacheStatus::Error).await?;
                Ok(result)
            }
            Err(e) => Err(e),
        }
    }

    /// Computes an embedding for the text, serving from cache when possible.
    pub async fn embedding(
        &self,
        owner_id: &str,
        input: &str,
    ) -> Result<EmbeddingResult, DomainError> {
        let normalized = text::normalize(input);
        let key = self.key(owner_id, Task::Embed, &normalized);

        if let Some(cached) = self.cached::<EmbeddingResult>(&key).await? {
            return Ok(cached);
        }

        match self.provider.embed(&normalized).await {
            Ok(embedding) => {
                let result = EmbeddingResult {
                    embedding,
                    source: Source::External,
                };
                self.store(key, &normalized, &result, CacheStatus::Ok).await?;
                Ok(result)
            }
            Err(e) if e.is_degradation() => {
                warn!(task = %Task::Embed, error = %e, "degrading to fallback");
                let result = EmbeddingResult {
                    embedding: fallback::fallback_embedding(
                        &normalized,
                        self.config.embedding_dimension,
                    ),
                    source: Source::Fallback,
                };
                self.store(key, &normalized, &result, CacheStatus::Error).await?;
                Ok(result)
            }
            Err(e) => Err(e),
        }
    }

    /// Answers a question grounded in the supplied context notes.
    ///
    /// The cache key combines the question with the context fingerprint so
    /// the same question over changed notes recomputes. A degraded answer
    /// is returned uncached: there is no point memoizing the apology.
    pub async fn generate_answer(
        &self,
        owner_id: &str,
        question: &str,
        context: &str,
    ) -> Result<AnswerResult, DomainError> {
        let cache_input = format!("{}::{}", question, text::fingerprint(context));
        let key = self.key(owner_id, Task::Generate, &cache_input);

        if let Some(cached) = self.cached::<AnswerResult>(&key).await? {
            return Ok(cached);
        }

        let prompt = build_answer_prompt(question, context);

        match self.provider.generate(&prompt).await {
            Ok(answer) => {
                let result = AnswerResult {
                    answer,
                    source: Source::External,
                };
                self.store(key, &cache_input, &result, CacheStatus::Ok).await?;
                Ok(result)
            }
            Err(e) if e.is_degradation() => {
                warn!(task = %Task::Generate, error = %e, "degrading to fallback");
                Ok(AnswerResult {
                    answer: fallback::NO_ANSWER_SENTINEL.to_string(),
                    source: Source::Fallback,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Runs summary, tags, and embedding as independent concurrent
    /// sub-tasks and joins all three. A failure in one does not cancel the
    /// others; each degrades to its own fallback independently.
    pub async fn analyze(&self, owner_id: &str, input: &str) -> Result<ContentAnalysis, DomainError> {
        let (summary, tags, embedding) = tokio::join!(
            self.summarize(owner_id, input),
            self.suggest_tags(owner_id, input, &[]),
            self.embedding(owner_id, input),
        );

        Ok(ContentAnalysis::new(summary?, tags?, embedding?))
    }

    fn key(&self, owner_id: &str, task: Task, input: &str) -> CacheKey {
        CacheKey::for_input(owner_id, task, self.provider.model_name(task), input)
    }

    async fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>, DomainError> {
        let Some(entry) = self.cache.get(key).await? else {
            return Ok(None);
        };

        match entry.response_as::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // A record we cannot read is replaced on the write that
                // follows the miss.
                warn!(task = %key.task, error = %e, "unreadable cache record, treating as miss");
                Ok(None)
            }
        }
    }

    async fn store<T: Serialize>(
        &self,
        key: CacheKey,
        input: &str,
        result: &T,
        status: CacheStatus,
    ) -> Result<(), DomainError> {
        let response = serde_json::to_value(result)
            .map_err(|e| DomainError::cache(format!("Failed to serialize cache value: {}", e)))?;

        let source = match status {
            CacheStatus::Ok => Source::External,
            CacheStatus::Error => Source::Fallback,
        };

        let entry = CacheEntry::new(key, input, response, source, status, self.config.cache_ttl);
        self.cache.put(entry).await
    }
}

fn build_answer_prompt(question: &str, context: &str) -> String {
    format!(
        "<s>[INST] You are a helpful personal assistant for a \"Second Brain\" application.\n\
         Answer the user's question primarily based on the provided CONTEXT from their notes.\n\
         If the context doesn't contain the answer, say \"I couldn't find that in your notes, but...\" \
         and then provide a general answer if you know it, or just say you don't know.\n\
         Keep the answer concise and friendly.\n\n\
         CONTEXT:\n{}\n\nQUESTION:\n{} [/INST]",
        context, question
    )
}
