//! Vespa query-API retrievers
//!
//! Both legs POST a JSON query to the same endpoint. The lexical leg sends
//! `userQuery()` YQL with a BM25 rank profile; the semantic leg sends a
//! `nearestNeighbor` YQL with the query vector as a tensor input.

use super::registry::RetrieverSet;
use super::snippet::{normalize_document_id, shorten};
use super::traits::{Retriever, RetrieverError, RetrieverQuery, RetrieverResult};
use crate::config::{Config, SearchBackendConfig};
use crate::types::{ScoreList, ScoredDocument, Source};
use crate::util::truncate_str;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct VespaResponse {
    #[serde(default)]
    root: VespaRoot,
}

#[derive(Debug, Default, Deserialize)]
struct VespaRoot {
    #[serde(default)]
    fields: Option<RootFields>,
    #[serde(default)]
    children: Vec<VespaHit>,
    #[serde(default)]
    errors: Vec<VespaError>,
}

#[derive(Debug, Deserialize)]
struct RootFields {
    #[serde(rename = "totalCount")]
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct VespaHit {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    relevance: Option<f64>,
    #[serde(default)]
    fields: HitFields,
}

#[derive(Debug, Default, Deserialize)]
struct HitFields {
    /// The document's own id field; may be a string or a number
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    documentid: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VespaError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl VespaError {
    fn describe(&self) -> String {
        let text = match (&self.summary, &self.message) {
            (Some(summary), Some(message)) => format!("{}: {}", summary, message),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => "unknown error".to_string(),
        };
        match self.code {
            Some(code) => format!("[{}] {}", code, text),
            None => text,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for one Vespa query endpoint, shared by both retrievers
#[derive(Debug, Clone)]
pub struct VespaClient {
    http: Client,
    search_url: String,
    timeout_ms: u64,
    snippet_width: usize,
}

impl VespaClient {
    pub fn new(config: &SearchBackendConfig, snippet_width: usize) -> RetrieverResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RetrieverError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            search_url: config.search_url(),
            timeout_ms: config.timeout_ms,
            snippet_width,
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// POST one query body and normalize the answer into a score list
    async fn query(&self, source: Source, body: &Value) -> RetrieverResult<ScoreList> {
        let start = Instant::now();

        let response = self
            .http
            .post(&self.search_url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            // Vespa reports query errors in the body even on 4xx/5xx
            let detail = serde_json::from_str::<VespaResponse>(&text)
                .ok()
                .and_then(|r| first_error(&r.root))
                .unwrap_or_else(|| truncate_str(&text, 200));
            return Err(RetrieverError::Unavailable(format!(
                "HTTP error ({}): {}",
                status, detail
            )));
        }

        let parsed: VespaResponse = serde_json::from_str(&text)
            .map_err(|e| RetrieverError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let list = self.normalize(source, parsed.root)?;

        debug!(
            "{} leg returned {} hits ({} total) in {}ms",
            source,
            list.len(),
            list.total_available(),
            start.elapsed().as_millis()
        );
        Ok(list)
    }

    fn normalize(&self, source: Source, root: VespaRoot) -> RetrieverResult<ScoreList> {
        if root.children.is_empty() {
            if let Some(detail) = first_error(&root) {
                return Err(RetrieverError::Unavailable(detail));
            }
        } else if let Some(detail) = first_error(&root) {
            // Partial answer, e.g. one content node timed out
            warn!("{} leg returned hits with errors: {}", source, detail);
        }

        let returned = root.children.len() as u64;
        let total = root
            .fields
            .and_then(|f| f.total_count)
            .unwrap_or(returned);

        let hits = root
            .children
            .into_iter()
            .filter_map(|hit| self.to_document(hit))
            .collect();

        Ok(ScoreList::from_hits(source, hits, total))
    }

    fn to_document(&self, hit: VespaHit) -> Option<ScoredDocument> {
        let VespaHit {
            id,
            relevance,
            fields,
        } = hit;

        let Some(raw_id) = fields.documentid.or(id) else {
            debug!("Skipping hit without a document id");
            return None;
        };

        let display_id = fields
            .id
            .as_ref()
            .and_then(value_to_string)
            .unwrap_or_else(|| normalize_document_id(&raw_id));

        let text = fields.text.filter(|t| !t.is_empty());
        let snippet = text
            .as_deref()
            .map(|t| shorten(t, self.snippet_width))
            .unwrap_or_default();

        let mut document = ScoredDocument::new(raw_id, relevance.unwrap_or(0.0)).with_snippet(snippet);
        document.display_id = Some(display_id);
        document.url = fields.url;
        document.text = text;
        Some(document)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> RetrieverError {
        if err.is_timeout() {
            RetrieverError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            RetrieverError::Unavailable(err.to_string())
        }
    }
}

fn first_error(root: &VespaRoot) -> Option<String> {
    root.errors.first().map(VespaError::describe)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Retrievers
// ============================================================================

/// BM25 retrieval through Vespa's `userQuery()`
#[derive(Debug, Clone)]
pub struct LexicalRetriever {
    client: VespaClient,
    rank_profile: String,
}

impl LexicalRetriever {
    pub fn new(client: VespaClient, config: &SearchBackendConfig) -> Self {
        Self {
            client,
            rank_profile: config.lexical_rank_profile.clone(),
        }
    }

    fn request_body(&self, text: &str, limit: usize) -> Value {
        json!({
            "yql": format!("select * from sources * where userQuery() limit {}", limit),
            "query": text,
            "ranking": self.rank_profile,
            "hits": limit,
            "timeout": format!("{}ms", self.client.timeout_ms),
        })
    }
}

#[async_trait]
impl Retriever for LexicalRetriever {
    fn source(&self) -> Source {
        Source::Lexical
    }

    async fn search(&self, query: RetrieverQuery<'_>, limit: usize) -> RetrieverResult<ScoreList> {
        let RetrieverQuery::Text(text) = query else {
            return Err(RetrieverError::UnsupportedQuery {
                retriever: Source::Lexical,
                kind: query.kind(),
            });
        };
        let body = self.request_body(text, limit);
        self.client.query(Source::Lexical, &body).await
    }
}

/// Approximate nearest-neighbor retrieval through Vespa's `nearestNeighbor`
#[derive(Debug, Clone)]
pub struct SemanticRetriever {
    client: VespaClient,
    rank_profile: String,
    embedding_field: String,
    query_tensor: String,
}

impl SemanticRetriever {
    pub fn new(client: VespaClient, config: &SearchBackendConfig) -> Self {
        Self {
            client,
            rank_profile: config.semantic_rank_profile.clone(),
            embedding_field: config.embedding_field.clone(),
            query_tensor: config.query_tensor.clone(),
        }
    }

    fn request_body(&self, vector: &[f32], limit: usize) -> Value {
        let yql = format!(
            "select * from sources * where {{targetHits:{limit}}}nearestNeighbor({field},{tensor}) limit {limit}",
            limit = limit,
            field = self.embedding_field,
            tensor = self.query_tensor,
        );

        let mut body = Map::new();
        body.insert("yql".to_string(), Value::from(yql));
        body.insert(
            format!("input.query({})", self.query_tensor),
            Value::from(vector.to_vec()),
        );
        body.insert("ranking".to_string(), Value::from(self.rank_profile.clone()));
        body.insert("hits".to_string(), Value::from(limit));
        body.insert(
            "timeout".to_string(),
            Value::from(format!("{}ms", self.client.timeout_ms)),
        );
        Value::Object(body)
    }
}

#[async_trait]
impl Retriever for SemanticRetriever {
    fn source(&self) -> Source {
        Source::Semantic
    }

    async fn search(&self, query: RetrieverQuery<'_>, limit: usize) -> RetrieverResult<ScoreList> {
        let RetrieverQuery::Vector(vector) = query else {
            return Err(RetrieverError::UnsupportedQuery {
                retriever: Source::Semantic,
                kind: query.kind(),
            });
        };
        let body = self.request_body(vector, limit);
        self.client.query(Source::Semantic, &body).await
    }
}

/// Build the lexical and semantic retrievers over one shared client
pub fn init_retrievers(config: &Config) -> Result<RetrieverSet> {
    let client = VespaClient::new(&config.backend, config.retrieval.snippet_width)
        .context("Failed to create search backend client")?;

    info!("Search backend: {}", client.search_url());

    Ok(RetrieverSet::new()
        .with(Arc::new(LexicalRetriever::new(client.clone(), &config.backend)))
        .with(Arc::new(SemanticRetriever::new(client, &config.backend))))
}
