//! Retriever adapter contract

use crate::types::{ScoreList, Source};
use async_trait::async_trait;
use std::fmt::Debug;

/// Input handed to a retriever: text for lexical engines, a vector for ANN
#[derive(Debug, Clone, Copy)]
pub enum RetrieverQuery<'a> {
    Text(&'a str),
    Vector(&'a [f32]),
}

impl RetrieverQuery<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Vector(_) => "vector",
        }
    }
}

/// Errors raised by a retriever adapter
#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    /// The engine did not answer within the per-call timeout
    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The engine could not be reached or reported a failure
    #[error("{0}")]
    Unavailable(String),

    /// The engine answered with a body that could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The retriever was handed the wrong kind of query
    #[error("{retriever} retriever cannot search by {kind}")]
    UnsupportedQuery { retriever: Source, kind: &'static str },
}

/// Result type for retriever operations
pub type RetrieverResult<T> = Result<T, RetrieverError>;

/// A single request/response call into an external ranking engine.
///
/// Implementations ask the engine for at least `limit` candidates, normalize
/// the answer into a [`ScoreList`] and never retry internally.
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    /// Which source this retriever feeds
    fn source(&self) -> Source;

    /// Run one search
    async fn search(&self, query: RetrieverQuery<'_>, limit: usize) -> RetrieverResult<ScoreList>;
}
