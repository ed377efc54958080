//! HTTP API Request/Response Types
//!
//! JSON-serializable types for the HTTP API. Successful searches return the
//! dispatcher's [`ResponseEnvelope`](crate::types::ResponseEnvelope) as is.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Search request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The search query text
    pub query: String,
    /// Number of results to return; clamped into `[1, max_limit]`
    #[serde(default)]
    pub limit: Option<i64>,
    /// Ranking profile: "bm25" (default), "semantic" or "fusion"
    #[serde(default)]
    pub ranking: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Whether the service is healthy
    pub healthy: bool,
    /// Service version
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("INVALID_QUERY", message)
    }
}

impl From<&SearchError> for ErrorResponse {
    fn from(err: &SearchError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// HTTP status for a dispatch failure.
///
/// Caller mistakes are 400, exhausted budgets 504, and any other upstream
/// failure 502.
pub fn error_status(err: &SearchError) -> StatusCode {
    match err {
        SearchError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        SearchError::Timeout { .. } | SearchError::RetrieverTimeout { .. } => {
            StatusCode::GATEWAY_TIMEOUT
        }
        SearchError::RetrieverUnavailable { .. } | SearchError::EmbeddingFailed(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}
