//! Retrieval, fusion and result-limit configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a fusion dispatch does when one of its two legs fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionFallback {
    /// Answer with the surviving leg and flag it in `ranking_profile`
    #[default]
    Degrade,
    /// Fail the request with the failing leg's error
    Fail,
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Limit applied when the request carries none
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Upper bound every requested limit is clamped to
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// RRF smoothing constant k; larger values flatten the advantage of rank 1
    #[serde(default = "default_rrf_k")]
    pub rrf_k: f64,
    /// Candidates requested per leg in fusion mode, as a multiple of the limit
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: f64,
    /// Budget for a whole dispatch (all legs, fusion and assembly)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Behaviour when a fusion leg fails
    #[serde(default)]
    pub fusion_fallback: FusionFallback,
    /// Maximum snippet width in characters
    #[serde(default = "default_snippet_width")]
    pub snippet_width: usize,
    /// Maximum accepted query length in bytes
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

fn default_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    100
}

fn default_rrf_k() -> f64 {
    60.0
}

fn default_overfetch_factor() -> f64 {
    3.0
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_snippet_width() -> usize {
    360
}

fn default_max_query_length() -> usize {
    10_000
}

impl RetrievalConfig {
    /// Clamp a requested limit into `[1, max_limit]`, using the default when absent
    pub fn clamp_limit(&self, requested: Option<i64>) -> usize {
        let requested = requested.unwrap_or(self.default_limit as i64);
        let max = self.max_limit.max(1) as i64;
        requested.clamp(1, max) as usize
    }

    /// Number of candidates each fusion leg is asked for
    pub fn fusion_candidates(&self, limit: usize) -> usize {
        let scaled = (self.overfetch_factor * limit as f64).ceil() as usize;
        scaled.max(limit)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            rrf_k: default_rrf_k(),
            overfetch_factor: default_overfetch_factor(),
            request_timeout_ms: default_request_timeout_ms(),
            fusion_fallback: FusionFallback::default(),
            snippet_width: default_snippet_width(),
            max_query_length: default_max_query_length(),
        }
    }
}
