use std::time::Duration;

use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Inference credential is not configured")]
    MissingCredential,

    #[error("Inference request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Inference endpoint rate limited the request")]
    RateLimited,

    #[error("Upstream inference error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid inference payload: {message}")]
    InvalidPayload { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn upstream(status: impl Into<Option<u16>>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status: status.into(),
            message: message.into(),
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error is a degraded-inference condition the orchestrator
    /// converts into a fallback result instead of propagating.
    ///
    /// Cache and storage errors are excluded: without a working cache the
    /// pipeline cannot serve coherent, repeatable results, so those
    /// propagate as hard failures.
    pub fn is_degradation(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::Timeout(_)
                | Self::RateLimited
                | Self::Upstream { .. }
                | Self::InvalidPayload { .. }
        )
    }
}
