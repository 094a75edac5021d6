//! Timeout and retry wrapper around a content generator.

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::ports::{ContentGenerator, GenerationError, GenerationRequest};

/// Bounded retry-with-backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles per retry.
    pub initial_backoff: Duration,
    /// Per-attempt timeout.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(250),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Wraps a generator with a per-attempt timeout and bounded retries.
///
/// Only retryable failures are retried; a rejected request comes back
/// immediately. When the budget is spent, the last failure is returned
/// and the compiler degrades to static fallback copy.
pub struct RetryingGenerator<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: ContentGenerator> RetryingGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl<G: ContentGenerator> ContentGenerator for RetryingGenerator<G> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let mut backoff = self.policy.initial_backoff;
        let mut last_error = GenerationError::Timeout {
            timeout_ms: self.policy.timeout.as_millis() as u64,
        };

        for attempt in 0..=self.policy.max_retries {
            if attempt > 0 {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            let outcome = tokio::time::timeout(self.policy.timeout, self.inner.generate(request))
                .await
                .map_err(|_| GenerationError::Timeout {
                    timeout_ms: self.policy.timeout.as_millis() as u64,
                });

            match outcome {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(err)) if !err.is_retryable() => return Err(err),
                Ok(Err(err)) | Err(err) => {
                    warn!(
                        backend = self.inner.name(),
                        attempt,
                        error = %err,
                        "generation attempt failed"
                    );
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
