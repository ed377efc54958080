//! Embedding backend configuration

use serde::{Deserialize, Serialize};

/// Default timeout for embedding requests
fn default_timeout_ms() -> u64 {
    2000
}

fn default_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_dimensions() -> usize {
    384
}

/// Embedding configuration
///
/// The embedder is only needed by the `semantic` and `fusion` profiles.
/// Leaving `endpoint` unset disables it; those profiles then fail (or, for
/// fusion, degrade) with an embedding error.
///
/// ```toml
/// [embedding]
/// endpoint = "http://localhost:1234/v1/embeddings"
/// model = "nomic-embed-text-v1.5"
/// dimensions = 768
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// API endpoint URL
    #[serde(default)]
    pub endpoint: Option<String>,
    /// API key; `OPENAI_API_KEY` fills it in when unset
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name for API requests
    #[serde(default = "default_model")]
    pub model: String,
    /// Embedding dimensions
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Bounded wait for one embedding call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl EmbeddingConfig {
    /// The configured endpoint, if embedding is enabled
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Whether the model accepts a requested output dimension
    pub fn sends_dimensions(&self) -> bool {
        self.model.starts_with("text-embedding-3")
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: default_model(),
            dimensions: default_dimensions(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
