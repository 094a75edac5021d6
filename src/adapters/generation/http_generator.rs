//! HTTP content generation backend.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{ContentGenerator, GenerationError, GenerationRequest};

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    prompt: &'a str,
    constraints: &'a [String],
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    text: String,
}

/// Talks to the external text generation service over HTTP.
///
/// Expected contract: `POST {endpoint}` with a JSON body of prompt and
/// constraints, bearer-token auth, and a JSON reply carrying the text.
/// Callers wrap this in [`super::RetryingGenerator`]; the per-request
/// timeout here is a last-resort socket guard.
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl HttpGenerator {
    /// Builds the backend client.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GenerationError::Unavailable {
                reason: err.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl ContentGenerator for HttpGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&GenerateBody {
                prompt: &request.prompt,
                constraints: &request.constraints,
            })
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GenerationError::Timeout { timeout_ms: 0 }
                } else {
                    GenerationError::Unavailable {
                        reason: err.to_string(),
                    }
                }
            })?;

        match response.status() {
            status if status.is_success() => {
                let reply: GenerateReply =
                    response
                        .json()
                        .await
                        .map_err(|err| GenerationError::Unavailable {
                            reason: format!("malformed reply: {}", err),
                        })?;
                Ok(reply.text)
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(GenerationError::RateLimited),
            status if status.is_client_error() => Err(GenerationError::InvalidRequest {
                reason: format!("backend rejected request with {}", status),
            }),
            status => Err(GenerationError::Unavailable {
                reason: format!("backend returned {}", status),
            }),
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
