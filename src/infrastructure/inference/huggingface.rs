//! Hugging Face inference API provider

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use super::Sleeper;
use crate::config::InferenceConfig;
use crate::domain::enrichment::{InferenceProvider, Task};
use crate::domain::DomainError;
use crate::infrastructure::http_client::{HttpClientTrait, HttpResponse};

/// Total attempt budget per call: the initial attempt plus one retry after
/// a model-loading (503) response.
const MAX_ATTEMPTS: u32 = 2;

/// Wait applied when a 503 body carries no usable `estimated_time`.
const DEFAULT_MODEL_LOADING_WAIT: Duration = Duration::from_secs(2);

/// Classifier scores below this are discarded.
const TAG_SCORE_THRESHOLD: f64 = 0.25;

/// Maximum number of tags taken from the classifier.
const MAX_TAGS: usize = 5;

/// Adapter for the Hugging Face hosted inference endpoints.
///
/// One HTTP POST per attempt to `{base}/{model}`; the retry policy is
/// status-driven: 503 (model loading) sleeps for the server-suggested delay
/// and retries once, 429 (rate limit) fails immediately as a fast-fail
/// signal to the fallback engine, and any other non-2xx fails the attempt.
#[derive(Debug)]
pub struct HfInferenceProvider<C: HttpClientTrait, S: Sleeper> {
    client: C,
    sleeper: S,
    config: InferenceConfig,
}

impl<C: HttpClientTrait, S: Sleeper> HfInferenceProvider<C, S> {
    pub fn new(client: C, sleeper: S, config: InferenceConfig) -> Self {
        Self {
            client,
            sleeper,
            config,
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), model)
    }

    /// Issues the request with the bounded retry policy.
    ///
    /// A missing credential is a hard failure before any network attempt.
    async fn call(
        &self,
        model: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let token = self
            .config
            .api_token
            .as_deref()
            .ok_or(DomainError::MissingCredential)?;

        let url = self.model_url(model);
        let auth_header = format!("Bearer {}", token);
        let headers = vec![
            ("Authorization", auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let mut attempt = 1;
        loop {
            let response = self
                .client
                .post_json(&url, headers.clone(), payload)
                .await?;

            match response.status {
                429 => {
                    warn!(model, "inference endpoint rate limited the request");
                    return Err(DomainError::RateLimited);
                }
                503 if attempt < MAX_ATTEMPTS => {
                    let wait = model_loading_delay(&response);
                    debug!(model, wait_secs = wait.as_secs_f64(), "model loading, retrying");
                    self.sleeper.sleep(wait).await;
                    attempt += 1;
                }
                status if !response.is_success() => {
                    return Err(DomainError::upstream(
                        status,
                        crate::domain::text::preview(&response.body, 200),
                    ));
                }
                _ => {
                    return response.json().ok_or_else(|| {
                        DomainError::invalid_payload("response body is not valid JSON")
                    });
                }
            }
        }
    }
}

/// Reads the server-suggested wait (seconds) from a 503 body.
fn model_loading_delay(response: &HttpResponse) -> Duration {
    response
        .json()
        .and_then(|body| body.get("estimated_time").and_then(|v| v.as_f64()))
        .filter(|secs| *secs > 0.0)
        .map(Duration::from_secs_f64)
        .unwrap_or(DEFAULT_MODEL_LOADING_WAIT)
}

/// Accepts either a flat numeric vector or a vector-of-vectors (first row).
fn parse_embedding(value: &serde_json::Value) -> Option<Vec<f32>> {
    let rows = value.as_array()?;

    let flat = match rows.first()? {
        serde_json::Value::Array(first_row) => first_row,
        _ => rows,
    };

    let vector: Vec<f32> = flat
        .iter()
        .filter_map(|v| v.as_f64().map(|f| f as f32))
        .collect();

    if vector.len() == flat.len() && !vector.is_empty() {
        Some(vector)
    } else {
        None
    }
}

#[async_trait]
impl<C: HttpClientTrait, S: Sleeper> InferenceProvider for HfInferenceProvider<C, S> {
    async fn summarize(&self, text: &str) -> Result<String, DomainError> {
        let payload = serde_json::json!({
            "inputs": text,
            "parameters": {
                "max_length": 120,
                "min_length": 30,
            },
        });

        let output = self.call(&self.config.summary_model, &payload).await?;

        let summary = output
            .get(0)
            .and_then(|first| first.get("summary_text"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim()
            .to_string();

        if summary.is_empty() {
            return Err(DomainError::invalid_payload("summary output is empty"));
        }

        Ok(summary)
    }

    async fn classify(&self, text: &str, labels: &[String]) -> Result<Vec<String>, DomainError> {
        let payload = serde_json::json!({
            "inputs": text,
            "parameters": {
                "candidate_labels": labels,
                "multi_label": true,
            },
        });

        let output = self.call(&self.config.tag_model, &payload).await?;

        let predicted = output
            .get("labels")
            .and_then(|v| v.as_array())
            .ok_or_else(|| DomainError::invalid_payload("missing labels array"))?;
        let scores = output
            .get("scores")
            .and_then(|v| v.as_array())
            .ok_or_else(|| DomainError::invalid_payload("missing scores array"))?;

        let mut scored: Vec<(String, f64)> = predicted
            .iter()
            .zip(scores.iter())
            .filter_map(|(label, score)| {
                let label = label.as_str()?.to_lowercase();
                let score = score.as_f64()?;
                Some((label, score))
            })
            .filter(|(_, score)| *score >= TAG_SCORE_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(MAX_TAGS);

        if scored.is_empty() {
            return Err(DomainError::invalid_payload(
                "no labels above the confidence threshold",
            ));
        }

        Ok(scored.into_iter().map(|(label, _)| label).collect())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let payload = serde_json::json!({
            "inputs": text,
            "options": {
                "wait_for_model": true,
            },
        });

        let output = self.call(&self.config.embedding_model, &payload).await?;

        parse_embedding(&output)
            .ok_or_else(|| DomainError::invalid_payload("embedding output is not a numeric vector"))
    }

    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let payload = serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": 512,
                "temperature": 0.7,
                "return_full_text": false,
            },
        });

        let output = self.call(&self.config.generation_model, &payload).await?;

        // Text generation responds with [{"generated_text": ...}] or the
        // bare object form depending on the model.
        let answer = output
            .get(0)
            .and_then(|first| first.get("generated_text"))
            .or_else(|| output.get("generated_text"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim()
            .to_string();

        if answer.is_empty() {
            return Err(DomainError::invalid_payload("generated answer is empty"));
        }

        Ok(answer)
    }

    fn model_name(&self, task: Task) -> &str {
        match task {
            Task::Summarize => &self.config.summary_model,
            Task::Tag => &self.config.tag_model,
            Task::Embed => &self.config.embedding_model,
            Task::Generate => &self.config.generation_model,
        }
    }
}
