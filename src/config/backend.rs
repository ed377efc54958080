//! Search backend (Vespa query endpoint) configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_url() -> String {
    "http://localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_search_path() -> String {
    "/search/".to_string()
}

fn default_lexical_rank_profile() -> String {
    "bm25".to_string()
}

fn default_semantic_rank_profile() -> String {
    "semantic".to_string()
}

fn default_embedding_field() -> String {
    "embedding".to_string()
}

fn default_query_tensor() -> String {
    "q".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

/// Connection and ranking settings for the search backend.
///
/// Both retrievers query the same endpoint; they differ in the YQL they send
/// and in the rank profile they ask for.
///
/// ```toml
/// [backend]
/// url = "http://localhost"
/// port = 8080
/// lexical_rank_profile = "bm25"
/// semantic_rank_profile = "semantic"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchBackendConfig {
    /// Base URL without port (e.g., "http://localhost")
    #[serde(default = "default_url")]
    pub url: String,
    /// Query API port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the query API
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Rank profile used by the lexical leg
    #[serde(default = "default_lexical_rank_profile")]
    pub lexical_rank_profile: String,
    /// Rank profile used by the semantic leg
    #[serde(default = "default_semantic_rank_profile")]
    pub semantic_rank_profile: String,
    /// Document field holding the embedding
    #[serde(default = "default_embedding_field")]
    pub embedding_field: String,
    /// Name of the query tensor passed as `input.query(<name>)`
    #[serde(default = "default_query_tensor")]
    pub query_tensor: String,
    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl SearchBackendConfig {
    /// Full URL of the query endpoint
    pub fn search_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        let path = if self.search_path.starts_with('/') {
            self.search_path.clone()
        } else {
            format!("/{}", self.search_path)
        };
        format!("{}:{}{}", base, self.port, path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SearchBackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            port: default_port(),
            search_path: default_search_path(),
            lexical_rank_profile: default_lexical_rank_profile(),
            semantic_rank_profile: default_semantic_rank_profile(),
            embedding_field: default_embedding_field(),
            query_tensor: default_query_tensor(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
