//! Dispatch error taxonomy
//!
//! Every failure surfaced to a caller is a [`SearchError`] with a stable
//! machine-readable code and a human-readable message.

use crate::embedding::backend::EmbeddingError;
use crate::retrieval::RetrieverError;
use crate::types::Source;

/// Errors returned by a search dispatch
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Rejected before dispatch; no external calls were made
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A retriever could not be reached or returned an unusable response
    #[error("{retriever} retriever unavailable: {message}")]
    RetrieverUnavailable { retriever: Source, message: String },

    /// A retriever did not answer within its per-call timeout
    #[error("{retriever} retriever timed out after {timeout_ms}ms")]
    RetrieverTimeout { retriever: Source, timeout_ms: u64 },

    /// The query text could not be embedded
    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    /// The whole dispatch exceeded its request budget
    #[error("Search request exceeded its {budget_ms}ms budget")]
    Timeout { budget_ms: u64 },
}

impl SearchError {
    /// Stable error code for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::RetrieverUnavailable { .. } => "RETRIEVER_UNAVAILABLE",
            Self::RetrieverTimeout { .. } => "RETRIEVER_TIMEOUT",
            Self::EmbeddingFailed(_) => "EMBEDDING_FAILED",
            Self::Timeout { .. } => "REQUEST_TIMEOUT",
        }
    }

    /// Attribute an adapter failure to the source that produced it
    pub fn from_retriever(retriever: Source, err: RetrieverError) -> Self {
        match err {
            RetrieverError::Timeout { timeout_ms } => Self::RetrieverTimeout {
                retriever,
                timeout_ms,
            },
            other => Self::RetrieverUnavailable {
                retriever,
                message: other.to_string(),
            },
        }
    }
}

impl From<EmbeddingError> for SearchError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::EmbeddingFailed(message) => Self::EmbeddingFailed(message),
            other => Self::EmbeddingFailed(other.to_string()),
        }
    }
}
