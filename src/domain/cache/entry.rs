//! Persisted cache record for one resolved enrichment result

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CacheKey;
use crate::domain::enrichment::Source;
use crate::domain::text;

/// Maximum stored length of the input preview, in characters.
const INPUT_PREVIEW_CHARS: usize = 200;

/// Whether the entry memoizes a successful resolution or a degraded one.
///
/// Failures are cached too, tagged `Error`, so repeated misses do not
/// hammer the remote service inside one TTL window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Ok,
    Error,
}

/// One cached enrichment result.
///
/// Never mutated except by whole-entry replacement; invalidated by time
/// alone once `expires_at` passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    /// Bounded-length prefix of the original input, for diagnostics.
    pub input_preview: String,
    /// Task-specific response payload.
    pub response: serde_json::Value,
    pub source: Source,
    pub status: CacheStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry expiring `ttl` from now.
    pub fn new(
        key: CacheKey,
        input: &str,
        response: serde_json::Value,
        source: Source,
        status: CacheStatus,
        ttl: Duration,
    ) -> Self {
        let created_at = Utc::now();
        let expires_at = created_at
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());

        Self {
            key,
            input_preview: text::preview(input, INPUT_PREVIEW_CHARS),
            response,
            source,
            status,
            created_at,
            expires_at,
        }
    }

    /// An entry is live strictly until its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Deserializes the stored response payload.
    pub fn response_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrichment::Task;

    fn key() -> CacheKey {
        CacheKey::for_input("user-1", Task::Summarize, "model-a", "hello")
    }

    #[test]
    fn test_fresh_entry_is_live() {
        let entry = CacheEntry::new(
            key(),
            "hello",
            serde_json::json!({"summary": "hi"}),
            Source::External,
            CacheStatus::Ok,
            Duration::from_secs(3600),
        );
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_entry_is_expired() {
        let entry = CacheEntry::new(
            key(),
            "hello",
            serde_json::json!({}),
            Source::Fallback,
            CacheStatus::Error,
            Duration::ZERO,
        );
        assert!(entry.is_expired());
    }

    #[test]
    fn test_input_preview_is_bounded() {
        let long_input = "x".repeat(500);
        let entry = CacheEntry::new(
            key(),
            &long_input,
            serde_json::json!({}),
            Source::External,
            CacheStatus::Ok,
            Duration::from_secs(60),
        );
        assert_eq!(entry.input_preview.len(), 200);
    }

    #[test]
    fn test_response_roundtrip() {
        let entry = CacheEntry::new(
            key(),
            "hello",
            serde_json::json!({"tags": ["react", "guide"]}),
            Source::External,
            CacheStatus::Ok,
            Duration::from_secs(60),
        );

        #[derive(serde::Deserialize)]
        struct Payload {
            tags: Vec<String>,
        }

        let payload: Payload = entry.response_as().unwrap();
        assert_eq!(payload.tags, vec!["react", "guide"]);
    }
}
