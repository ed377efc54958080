//! HTTP service configuration

use serde::{Deserialize, Serialize};

fn default_listen_addr() -> String {
    "127.0.0.1:8000".to_string()
}

/// HTTP API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address for the HTTP server (e.g., "0.0.0.0:8000")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Enable CORS (the search page may be served from another origin)
    #[serde(default)]
    pub cors_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_enabled: false,
        }
    }
}
