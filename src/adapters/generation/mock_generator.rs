//! Mock content generator for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{ContentGenerator, GenerationError, GenerationRequest};

/// Scriptable generator: queued responses are returned in order, then a
/// default response repeats. Records every request for assertions.
pub struct MockGenerator {
    scripted: Mutex<VecDeque<Result<String, GenerationError>>>,
    default_response: String,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            default_response: "Mock generated copy.".to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Changes the response returned once the script runs out.
    pub fn with_default_response(mut self, text: impl Into<String>) -> Self {
        self.default_response = text.into();
        self
    }

    /// Queues a successful response.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.scripted
            .lock()
            .expect("mock lock")
            .push_back(Ok(text.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.scripted
            .lock()
            .expect("mock lock")
            .push_back(Err(error));
        self
    }

    /// Queues the same failure `count` times.
    pub fn with_errors(mut self, error: GenerationError, count: usize) -> Self {
        for _ in 0..count {
            self = self.with_error(error.clone());
        }
        self
    }

    /// Number of generate calls received.
    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("mock lock").len()
    }

    /// Copies of every request received, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("mock lock").clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests
            .lock()
            .expect("mock lock")
            .push(request.clone());
        match self.scripted.lock().expect("mock lock").pop_front() {
            Some(scripted) => scripted,
            None => Ok(self.default_response.clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
