//! Embedding service with a bounded wait

use super::backend::{EmbeddingBackend, EmbeddingError, EmbeddingResult, OpenAiBackend};
use crate::config::Config;
use crate::types::Embedding;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Wraps an embedding backend with a timeout and output checks.
///
/// Never substitutes a placeholder vector: every failure, including an
/// all-zero or wrongly sized vector, is reported as an [`EmbeddingError`].
#[derive(Debug, Clone)]
pub struct EmbeddingService {
    backend: Arc<dyn EmbeddingBackend>,
    timeout: Duration,
}

impl EmbeddingService {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Embed `text`, giving up after the configured timeout
    pub async fn embed(&self, text: &str) -> EmbeddingResult<Embedding> {
        let start = Instant::now();
        let embedding = tokio::time::timeout(self.timeout, self.backend.embed(text))
            .await
            .map_err(|_| EmbeddingError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        let expected = self.backend.dimensions();
        if embedding.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: embedding.len(),
            });
        }
        if embedding.iter().all(|v| *v == 0.0) {
            return Err(EmbeddingError::EmbeddingFailed(
                "backend returned an all-zero vector".to_string(),
            ));
        }

        debug!(
            "Embedded query with {} backend in {}ms",
            self.backend.name(),
            start.elapsed().as_millis()
        );
        Ok(embedding)
    }

    pub fn dimensions(&self) -> usize {
        self.backend.dimensions()
    }
}

/// Build the embedding service from config.
///
/// Returns `Ok(None)` when no embedding endpoint is configured.
pub fn init_embedding_service(config: &Config) -> Result<Option<Arc<EmbeddingService>>> {
    let Some(endpoint) = config.embedding.endpoint() else {
        info!("No embedding endpoint configured; semantic and fusion profiles will not embed");
        return Ok(None);
    };

    let backend: Arc<dyn EmbeddingBackend> = Arc::new(
        OpenAiBackend::new(endpoint, &config.embedding).context("Failed to create embedding backend")?,
    );
    let timeout = Duration::from_millis(config.embedding.timeout_ms);

    info!(
        "Embedding service ready: {} backend, {} dimensions, {}ms timeout",
        backend.name(),
        backend.dimensions(),
        timeout.as_millis()
    );

    Ok(Some(Arc::new(EmbeddingService::new(backend, timeout))))
}
