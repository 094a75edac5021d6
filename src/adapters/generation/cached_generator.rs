//! Generation cache.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::ports::{ContentGenerator, GenerationError, GenerationRequest};

/// Caches generated copy by request.
///
/// The compiler builds prompts deterministically from the archetype and
/// the normalized profile, so identical assembly inputs produce identical
/// requests and reuse cached copy instead of re-invoking the backend.
/// Entries never expire on their own; they are dropped only by explicit
/// invalidation when the business edits its inputs.
pub struct CachedGenerator<G> {
    inner: G,
    cache: RwLock<HashMap<String, String>>,
}

impl<G: ContentGenerator> CachedGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Drops every cached entry.
    pub async fn invalidate_all(&self) {
        self.cache.write().await.clear();
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    fn cache_key(request: &GenerationRequest) -> String {
        let mut key = request.prompt.clone();
        for constraint in &request.constraints {
            key.push('\n');
            key.push_str(constraint);
        }
        key
    }
}

#[async_trait]
impl<G: ContentGenerator> ContentGenerator for CachedGenerator<G> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let key = Self::cache_key(request);
        if let Some(cached) = self.cache.read().await.get(&key) {
            debug!(backend = self.inner.name(), "generation cache hit");
            return Ok(cached.clone());
        }

        let text = self.inner.generate(request).await?;
        self.cache.write().await.insert(key, text.clone());
        Ok(text)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
