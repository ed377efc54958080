//! Embedder seam used by the dispatcher

use crate::types::Embedding;
use async_trait::async_trait;
use std::fmt::Debug;

/// Failures of a single query embedding
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// The endpoint answered, but not with a usable vector
    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    /// Non-success status from the embedding API
    #[error("Embedding API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// HTTP 429 from the embedding API
    #[error("Embedding API rate limited the request (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Expected {expected}-dimensional embedding, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// No answer within the bounded wait
    #[error("Embedding timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Embedding endpoint unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid embedding configuration: {0}")]
    Config(String),
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Turns query text into a dense vector
#[async_trait]
pub trait EmbeddingBackend: Send + Sync + Debug {
    async fn embed(&self, text: &str) -> EmbeddingResult<Embedding>;

    /// Length of every vector this backend produces
    fn dimensions(&self) -> usize;

    /// Short name for logs
    fn name(&self) -> &str;
}
