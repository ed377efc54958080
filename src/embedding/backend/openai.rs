//! OpenAI-compatible embeddings client

use super::traits::{EmbeddingBackend, EmbeddingError, EmbeddingResult};
use crate::config::EmbeddingConfig;
use crate::types::Embedding;
use crate::util::truncate_str;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Embeds one query per request against an OpenAI-compatible endpoint
#[derive(Debug)]
pub struct OpenAiBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
    send_dimensions: bool,
    timeout_ms: u64,
}

impl OpenAiBackend {
    /// Build the client for `endpoint`; no request is made
    pub fn new(endpoint: &str, config: &EmbeddingConfig) -> EmbeddingResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EmbeddingError::Config(format!("Failed to build HTTP client: {}", e)))?;

        if config.api_key.is_none() && endpoint.contains("openai.com") {
            warn!("No API key configured for {}", endpoint);
        }
        info!(
            "Embedding endpoint {} (model={}, dimensions={})",
            endpoint, config.model, config.dimensions
        );

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            send_dimensions: config.sends_dimensions(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn request<'a>(&'a self, text: &'a str) -> EmbeddingRequest<'a> {
        EmbeddingRequest {
            model: &self.model,
            input: [text],
            dimensions: self.send_dimensions.then_some(self.dimensions),
            encoding_format: "float",
        }
    }

    async fn check_status(response: Response) -> EmbeddingResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs * 1000);
            return Err(EmbeddingError::RateLimited { retry_after_ms });
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| truncate_str(body.trim(), 200));
        Err(EmbeddingError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> EmbeddingError {
        if err.is_timeout() {
            EmbeddingError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            EmbeddingError::Network(err)
        }
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiBackend {
    async fn embed(&self, text: &str) -> EmbeddingResult<Embedding> {
        let mut request = self.client.post(&self.endpoint).json(&self.request(text));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = Self::check_status(response).await?;

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::EmbeddingFailed(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &parsed.usage {
            debug!("Embedding used {} tokens", usage.total_tokens);
        }

        let data = parsed
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .ok_or_else(|| EmbeddingError::EmbeddingFailed("response contained no embedding".to_string()))?;

        if data.embedding.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: data.embedding.len(),
            });
        }
        Ok(unit_length(data.embedding))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Scale to unit L2 norm; a zero vector is returned as is
fn unit_length(mut vector: Embedding) -> Embedding {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}
