//! HTTP API Request Handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use super::types::{error_status, ErrorResponse, HealthResponse, SearchRequest};
use crate::query::QueryDispatcher;
use crate::util::truncate_str;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: Arc<QueryDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Arc<QueryDispatcher>) -> Self {
        Self { dispatcher }
    }
}

/// Search endpoint
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(rejection.body_text())),
            )
                .into_response();
        }
    };

    debug!(
        "HTTP search request: query={}, limit={:?}, ranking={:?}",
        truncate_str(&request.query, 80),
        request.limit,
        request.ranking
    );

    match state
        .dispatcher
        .search(&request.query, request.limit, request.ranking.as_deref())
        .await
    {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::from(&e))).into_response(),
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
