//! HTTP client seam for the inference gateway

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// A raw HTTP response: status plus body text.
///
/// Non-success statuses are returned, not converted to errors, because the
/// gateway's retry policy branches on specific status codes (429/503).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON, tolerating garbage by returning `None`.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Trait for HTTP POST operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, DomainError>;
}

/// Real HTTP client using reqwest with a hard per-request timeout.
///
/// The timeout is enforced with `tokio::time::timeout` as a cancellation
/// boundary: once it fires, the in-flight request future is dropped and the
/// call fails with `DomainError::Timeout`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, DomainError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let send = async {
            let response = request
                .json(body)
                .send()
                .await
                .map_err(|e| DomainError::upstream(None, format!("Request failed: {}", e)))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| DomainError::upstream(None, format!("Failed to read body: {}", e)))?;

            Ok(HttpResponse { status, body })
        };

        tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| DomainError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success_bounds() {
        assert!(HttpResponse { status: 200, body: String::new() }.is_success());
        assert!(HttpResponse { status: 299, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 199, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 429, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 503, body: String::new() }.is_success());
    }

    #[test]
    fn test_json_tolerates_garbage() {
        let garbage = HttpResponse {
            status: 503,
            body: "<html>busy</html>".to_string(),
        };
        assert!(garbage.json().is_none());

        let valid = HttpResponse {
            status: 503,
            body: "{\"estimated_time\": 4.5}".to_string(),
        };
        assert_eq!(valid.json().unwrap()["estimated_time"], 4.5);
    }
}
