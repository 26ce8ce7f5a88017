use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for text-embedding backends.
///
/// Implementations connect to an external service and return a fixed-length
/// vector for a piece of text. Failures are expected and must stay recoverable:
/// the router converts them into a degraded semantic channel, never a request
/// failure.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Stable name used for request routing and cache bookkeeping.
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding provider '{provider}' not configured: {reason}")]
    NotConfigured { provider: String, reason: String },
    #[error("embedding request failed: {0}")]
    Transport(String),
    #[error("embedding response malformed: {0}")]
    Malformed(String),
}

/// Cosine similarity of two dense vectors. Zero-magnitude or mismatched inputs
/// yield 0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Client for OpenAI-compatible `/embeddings` endpoints.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingClient {
    name: String,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpEmbeddingClient {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Preset for the OpenAI embeddings API, keyed by `OPENAI_API_KEY`.
    pub fn openai() -> Self {
        Self::new(
            "openai",
            "https://api.openai.com/v1/embeddings",
            "text-embedding-3-small",
            std::env::var("OPENAI_API_KEY").ok(),
        )
    }

    /// Preset for the Mistral embeddings API, keyed by `MISTRAL_API_KEY`.
    pub fn mistral() -> Self {
        Self::new(
            "mistral",
            "https://api.mistral.ai/v1/embeddings",
            "mistral-embed",
            std::env::var("MISTRAL_API_KEY").ok(),
        )
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingHttpRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingHttpResponse {
    data: Vec<EmbeddingHttpRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingHttpRow {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EmbeddingError::NotConfigured {
                provider: self.name.clone(),
                reason: "missing API key".to_string(),
            })?;

        let input = text.replace('\n', " ");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&EmbeddingHttpRequest {
                model: &self.model,
                input: [input.as_str()],
            })
            .send()
            .await
            .map_err(|err| EmbeddingError::Transport(err.to_string()))?
            .error_for_status()
            .map_err(|err| EmbeddingError::Transport(err.to_string()))?;

        let payload: EmbeddingHttpResponse = response
            .json()
            .await
            .map_err(|err| EmbeddingError::Malformed(err.to_string()))?;

        payload
            .data
            .into_iter()
            .next()
            .map(|row| row.embedding)
            .ok_or_else(|| EmbeddingError::Malformed("no embedding rows in response".to_string()))
    }
}

/// Per-profile description vectors for one provider, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedProfileEmbeddings {
    pub provider: String,
    pub vectors: Vec<(String, Vec<f32>)>,
}

/// Write-once-read-many cache of profile description embeddings.
///
/// Entries are built on the first routing request and reused for the process
/// lifetime unless `invalidate` is called (catalog reload) or a request selects
/// a different provider. Concurrent builders may race; recomputation is
/// idempotent and the last write wins.
#[derive(Default)]
pub struct ProfileEmbeddingCache {
    inner: Mutex<Option<Arc<CachedProfileEmbeddings>>>,
}

impl ProfileEmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached vectors if they were built with the given provider.
    pub fn get(&self, provider: &str) -> Option<Arc<CachedProfileEmbeddings>> {
        let guard = self.inner.lock().expect("embedding cache mutex poisoned");
        guard
            .as_ref()
            .filter(|cached| cached.provider == provider)
            .cloned()
    }

    pub fn store(&self, cached: CachedProfileEmbeddings) -> Arc<CachedProfileEmbeddings> {
        let cached = Arc::new(cached);
        let mut guard = self.inner.lock().expect("embedding cache mutex poisoned");
        *guard = Some(cached.clone());
        cached
    }

    /// Drop the cached vectors so the next request rebuilds them.
    pub fn invalidate(&self) {
        let mut guard = self.inner.lock().expect("embedding cache mutex poisoned");
        *guard = None;
    }
}
