//! Content generation port.
//!
//! The compiler asks an external service (typically an LLM behind an HTTP
//! API) for business-tier copy. The service is assumed slow, rate-limited
//! and occasionally down; callers wrap it with the retrying adapter and
//! fall back to catalog static content when it stays down.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a content generation backend.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("generation backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("rate limited by generation backend")]
    RateLimited,

    #[error("generation request rejected: {reason}")]
    InvalidRequest { reason: String },
}

impl GenerationError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Timeout { .. }
                | GenerationError::Unavailable { .. }
                | GenerationError::RateLimited
        )
    }
}

/// A single generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// What to write, with the business context baked in.
    pub prompt: String,
    /// Constraints the backend should honor (tone, length, spelling).
    pub constraints: Vec<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }
}

/// External text generation capability.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generates copy for the request.
    ///
    /// # Errors
    ///
    /// Backend-specific failures as [`GenerationError`]; callers decide
    /// whether to retry based on [`GenerationError::is_retryable`].
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
