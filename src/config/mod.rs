//! Configuration for simplesearch
//!
//! Built once at process start (file, then environment overrides) and passed
//! by reference afterwards. Nothing reads the environment at request time.

mod backend;
mod embedding;
mod http;
mod logging;
mod retrieval;

pub use backend::SearchBackendConfig;
pub use embedding::EmbeddingConfig;
pub use http::HttpConfig;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use retrieval::{FusionFallback, RetrievalConfig};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search backend shared by the lexical and semantic retrievers
    #[serde(default)]
    pub backend: SearchBackendConfig,
    /// Query embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Limits, fusion and timeout configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// HTTP API server configuration
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults; then
    /// apply environment overrides and validate the result.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        let vars: HashMap<String, String> = std::env::vars().collect();
        config.apply_env_overrides(&vars)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the supported environment variables.
    ///
    /// Takes the variables as a map so the lookup happens exactly once, at
    /// startup.
    pub fn apply_env_overrides(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(url) = vars.get("VESPA_URL") {
            self.backend.url = url.clone();
        }
        if let Some(port) = vars.get("VESPA_PORT") {
            self.backend.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid VESPA_PORT '{}': {}", port, e))?;
        }
        if let Some(limit) = vars.get("VESPA_RESULT_LIMIT") {
            self.retrieval.default_limit = limit
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid VESPA_RESULT_LIMIT '{}': {}", limit, e))?;
        }
        if let Some(limit) = vars.get("VESPA_MAX_RESULT_LIMIT") {
            self.retrieval.max_limit = limit.trim().parse().map_err(|e| {
                anyhow::anyhow!("Invalid VESPA_MAX_RESULT_LIMIT '{}': {}", limit, e)
            })?;
        }
        if let Some(endpoint) = vars.get("SIMPLESEARCH_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = Some(endpoint.clone());
        }
        if self.embedding.api_key.is_none() {
            self.embedding.api_key = vars.get("OPENAI_API_KEY").cloned();
        }
        if let Some(addr) = vars.get("SIMPLESEARCH_LISTEN_ADDR") {
            self.http.listen_addr = addr.clone();
        }
        Ok(())
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        // Backend validation
        if url::Url::parse(&self.backend.url).is_err() {
            errors.push(format!("backend url '{}' is not a valid URL", self.backend.url));
        }
        if self.backend.port == 0 {
            errors.push("backend port must be between 1 and 65535".to_string());
        }
        if self.backend.timeout_ms == 0 {
            errors.push("backend timeout_ms must be positive".to_string());
        }
        if self.backend.lexical_rank_profile.trim().is_empty() {
            errors.push("lexical_rank_profile must not be empty".to_string());
        }
        if self.backend.semantic_rank_profile.trim().is_empty() {
            errors.push("semantic_rank_profile must not be empty".to_string());
        }

        // Embedding validation
        if self.embedding.dimensions == 0 {
            errors.push("embedding dimensions must be positive".to_string());
        }
        if self.embedding.dimensions > 4096 {
            errors.push("embedding dimensions must be <= 4096".to_string());
        }
        if self.embedding.timeout_ms == 0 {
            errors.push("embedding timeout_ms must be positive".to_string());
        }
        if let Some(endpoint) = self.embedding.endpoint() {
            if url::Url::parse(endpoint).is_err() {
                errors.push(format!("embedding endpoint '{}' is not a valid URL", endpoint));
            }
        }

        // Retrieval validation
        if self.retrieval.default_limit == 0 {
            errors.push("default_limit must be positive".to_string());
        }
        if self.retrieval.max_limit < self.retrieval.default_limit {
            errors.push(format!(
                "max_limit ({}) must be >= default_limit ({})",
                self.retrieval.max_limit, self.retrieval.default_limit
            ));
        }
        if !self.retrieval.rrf_k.is_finite() || self.retrieval.rrf_k <= 0.0 {
            errors.push("rrf_k must be a positive number".to_string());
        }
        if !self.retrieval.overfetch_factor.is_finite() || self.retrieval.overfetch_factor < 1.0 {
            errors.push("overfetch_factor must be >= 1.0".to_string());
        }
        if self.retrieval.request_timeout_ms == 0 {
            errors.push("request_timeout_ms must be positive".to_string());
        }
        if self.retrieval.snippet_width < 16 {
            errors.push("snippet_width must be >= 16".to_string());
        }
        if self.retrieval.max_query_length == 0 {
            errors.push("max_query_length must be positive".to_string());
        }

        // HTTP config validation
        if self.http.listen_addr.parse::<SocketAddr>().is_err() {
            errors.push(format!(
                "HTTP listen_addr '{}' must be a socket address (host:port)",
                self.http.listen_addr
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // ========================================================================
    // Helper: build a valid default config for mutation-based testing
    // ========================================================================

    fn valid_config() -> Config {
        Config::default()
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ========================================================================
    // Config::validate
    // ========================================================================

    #[test]
    fn default_config_passes_validation() {
        let cfg = valid_config();
        assert!(cfg.validate().is_ok(), "default config should be valid");
    }

    #[test]
    fn validate_rejects_zero_rrf_k() {
        let mut cfg = valid_config();
        cfg.retrieval.rrf_k = 0.0;
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("rrf_k"), "unexpected error: {}", err);
    }

    #[test]
    fn validate_rejects_nan_rrf_k() {
        let mut cfg = valid_config();
        cfg.retrieval.rrf_k = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_overfetch_below_one() {
        let mut cfg = valid_config();
        cfg.retrieval.overfetch_factor = 0.5;
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("overfetch_factor"));
    }

    #[test]
    fn validate_rejects_max_below_default_limit() {
        let mut cfg = valid_config();
        cfg.retrieval.default_limit = 50;
        cfg.retrieval.max_limit = 20;
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("max_limit (20)"));
    }

    #[test]
    fn validate_rejects_bad_listen_addr() {
        let mut cfg = valid_config();
        cfg.http.listen_addr = "localhost".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_embedding_endpoint() {
        let mut cfg = valid_config();
        cfg.embedding.endpoint = Some("not a url".to_string());
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("embedding endpoint"), "unexpected error: {}", err);
    }

    #[test]
    fn load_embedding_section_needs_only_an_endpoint() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[embedding]\nendpoint = \"http://localhost:1234/v1/embeddings\"\nmodel = \"nomic-embed-text-v1.5\"\ndimensions = 768"
        )
        .unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.embedding.endpoint(), Some("http://localhost:1234/v1/embeddings"));
        assert_eq!(cfg.embedding.dimensions, 768);
    }

    #[test]
    fn validate_reports_all_errors_together() {
        let mut cfg = valid_config();
        cfg.backend.timeout_ms = 0;
        cfg.embedding.dimensions = 0;
        cfg.retrieval.request_timeout_ms = 0;
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("backend timeout_ms"));
        assert!(err.contains("embedding dimensions"));
        assert!(err.contains("request_timeout_ms"));
    }

    // ========================================================================
    // Environment overrides
    // ========================================================================

    #[test]
    fn env_overrides_backend_and_limits() {
        let mut cfg = valid_config();
        cfg.apply_env_overrides(&vars(&[
            ("VESPA_URL", "http://vespa"),
            ("VESPA_PORT", "19071"),
            ("VESPA_RESULT_LIMIT", "20"),
            ("VESPA_MAX_RESULT_LIMIT", "200"),
        ]))
        .unwrap();

        assert_eq!(cfg.backend.search_url(), "http://vespa:19071/search/");
        assert_eq!(cfg.retrieval.default_limit, 20);
        assert_eq!(cfg.retrieval.max_limit, 200);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn env_api_key_only_fills_a_missing_key() {
        let mut cfg = valid_config();
        cfg.apply_env_overrides(&vars(&[("OPENAI_API_KEY", "sk-env")])).unwrap();
        assert_eq!(cfg.embedding.api_key.as_deref(), Some("sk-env"));

        let mut cfg = valid_config();
        cfg.embedding.api_key = Some("sk-file".to_string());
        cfg.apply_env_overrides(&vars(&[("OPENAI_API_KEY", "sk-env")])).unwrap();
        assert_eq!(cfg.embedding.api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn env_overrides_reject_garbage_port() {
        let mut cfg = valid_config();
        let err = cfg
            .apply_env_overrides(&vars(&[("VESPA_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("VESPA_PORT"));
    }

    #[test]
    fn env_overrides_ignore_unrelated_vars() {
        let mut cfg = valid_config();
        cfg.apply_env_overrides(&vars(&[("HOME", "/root")])).unwrap();
        assert_eq!(cfg.backend.port, 8080);
    }

    // ========================================================================
    // Config::load
    // ========================================================================

    #[test]
    fn load_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[retrieval]\nrrf_k = 10.0\nfusion_fallback = \"fail\"\n\n[backend]\nport = 9090"
        )
        .unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.retrieval.rrf_k, 10.0);
        assert_eq!(cfg.retrieval.fusion_fallback, FusionFallback::Fail);
        assert_eq!(cfg.retrieval.max_limit, 100);
        assert_eq!(cfg.backend.port, 9090);
        assert_eq!(cfg.backend.lexical_rank_profile, "bm25");
    }

    #[test]
    fn load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[retrieval]\ndefault_limit = 0").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/simplesearch.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn default_config_roundtrips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.http.listen_addr, "127.0.0.1:8000");
        assert!(parsed.validate().is_ok());
    }
}
