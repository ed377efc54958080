//! Core types for the hybrid search dispatcher

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Opaque, stable identifier of a document in the search backend
pub type DocumentId = String;

/// Embedding vector type
pub type Embedding = Vec<f32>;

/// Retrieval source that produced a ranked list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// BM25 full-text retrieval
    Lexical,
    /// Approximate nearest-neighbor retrieval over embeddings
    Semantic,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Ranking profiles
// ============================================================================

/// Ranking profile requested by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingProfile {
    /// Lexical retrieval only
    #[default]
    Bm25,
    /// Dense retrieval only
    Semantic,
    /// Both retrievers, merged with Reciprocal Rank Fusion
    Fusion,
}

impl RankingProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bm25 => "bm25",
            Self::Semantic => "semantic",
            Self::Fusion => "fusion",
        }
    }

    /// Sources consulted by this profile. Fusion merges its lists in this
    /// order, so the lexical copy of a shared document is the one presented.
    pub fn sources(&self) -> &'static [Source] {
        match self {
            Self::Bm25 => &[Source::Lexical],
            Self::Semantic => &[Source::Semantic],
            Self::Fusion => &[Source::Lexical, Source::Semantic],
        }
    }
}

impl fmt::Display for RankingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bm25" => Ok(Self::Bm25),
            "semantic" => Ok(Self::Semantic),
            "fusion" => Ok(Self::Fusion),
            other => Err(format!(
                "unknown ranking profile '{}' (expected bm25, semantic or fusion)",
                other
            )),
        }
    }
}

/// Profile actually applied to a response.
///
/// Differs from the requested [`RankingProfile`] only when a fusion dispatch
/// degraded to a single leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedProfile {
    Bm25,
    Semantic,
    Fusion,
    FusionLexicalFallback,
    FusionSemanticFallback,
}

impl AppliedProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bm25 => "bm25",
            Self::Semantic => "semantic",
            Self::Fusion => "fusion",
            Self::FusionLexicalFallback => "fusion_lexical_fallback",
            Self::FusionSemanticFallback => "fusion_semantic_fallback",
        }
    }

    /// True when a fusion request was answered by a single leg
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            Self::FusionLexicalFallback | Self::FusionSemanticFallback
        )
    }
}

impl From<RankingProfile> for AppliedProfile {
    fn from(profile: RankingProfile) -> Self {
        match profile {
            RankingProfile::Bm25 => Self::Bm25,
            RankingProfile::Semantic => Self::Semantic,
            RankingProfile::Fusion => Self::Fusion,
        }
    }
}

impl fmt::Display for AppliedProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Query
// ============================================================================

/// A validated search query.
///
/// Built per request by [`crate::query::build_query`], which guarantees a
/// non-empty trimmed text and a limit already clamped into `[1, max_limit]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub profile: RankingProfile,
    pub limit: usize,
}

impl Query {
    pub fn new(text: impl Into<String>, profile: RankingProfile, limit: usize) -> Self {
        Self {
            text: text.into(),
            profile,
            limit,
        }
    }
}

// ============================================================================
// Score lists
// ============================================================================

/// A document reference as returned by one retriever
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Stable identity used for deduplication across sources
    pub document_id: DocumentId,
    /// Human-facing identifier (the document's own `id` field when present)
    pub display_id: Option<String>,
    /// Retriever-specific score, not comparable across retrievers
    pub native_score: f64,
    /// 1-based position within the owning [`ScoreList`]
    pub rank: usize,
    /// Source URL of the document
    pub url: Option<String>,
    /// Full document text as returned by the backend
    pub text: Option<String>,
    /// Whitespace-collapsed, shortened preview of `text`
    pub snippet: String,
}

impl ScoredDocument {
    /// Create a document with an unassigned rank
    pub fn new(document_id: impl Into<DocumentId>, native_score: f64) -> Self {
        Self {
            document_id: document_id.into(),
            display_id: None,
            native_score,
            rank: 0,
            url: None,
            text: None,
            snippet: String::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }
}

/// Ordered, duplicate-free list of documents produced by a single source.
///
/// Ordering is descending native score; ranks are derived from position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreList {
    source: Source,
    documents: Vec<ScoredDocument>,
    total_available: u64,
}

impl ScoreList {
    /// Normalize raw retriever hits into a score list.
    ///
    /// Hits are sorted by descending native score (ties by ascending
    /// `document_id`), duplicates keep their best-scored occurrence, and
    /// ranks are renumbered from 1.
    pub fn from_hits(source: Source, mut hits: Vec<ScoredDocument>, total_available: u64) -> Self {
        hits.sort_by(|a, b| {
            b.native_score
                .partial_cmp(&a.native_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });

        let mut seen: HashSet<DocumentId> = HashSet::with_capacity(hits.len());
        hits.retain(|hit| seen.insert(hit.document_id.clone()));

        for (position, hit) in hits.iter_mut().enumerate() {
            hit.rank = position + 1;
        }

        // The engine can't have fewer matches than it handed back
        let total_available = total_available.max(hits.len() as u64);

        Self {
            source,
            documents: hits,
            total_available,
        }
    }

    /// An empty list for `source`
    pub fn empty(source: Source) -> Self {
        Self {
            source,
            documents: Vec::new(),
            total_available: 0,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Best-known number of matches in the backend before truncation
    pub fn total_available(&self) -> u64 {
        self.total_available
    }

    pub fn documents(&self) -> &[ScoredDocument] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by identity
    pub fn find(&self, document_id: &str) -> Option<&ScoredDocument> {
        self.documents.iter().find(|d| d.document_id == document_id)
    }
}

/// A document after rank fusion
#[derive(Debug, Clone, PartialEq)]
pub struct FusedResult {
    pub document_id: DocumentId,
    pub fused_score: f64,
    /// Rank of the document in every source that returned it
    pub contributing_ranks: BTreeMap<Source, usize>,
}

impl FusedResult {
    /// Number of sources that returned this document
    pub fn source_count(&self) -> usize {
        self.contributing_ranks.len()
    }
}

// ============================================================================
// Response envelope
// ============================================================================

/// A presentable search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Display identifier
    pub id: Option<String>,
    /// Backend document identifier
    pub document_id: DocumentId,
    pub url: Option<String>,
    pub text: Option<String>,
    pub snippet: String,
    /// Native score for single-source profiles, RRF score for fusion
    pub relevance: f64,
    /// Sources that returned this document
    pub matched_by: Vec<Source>,
}

/// Externally visible result of one dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub query: String,
    pub hits: Vec<Hit>,
    pub returned: usize,
    pub total_available: u64,
    pub limit: usize,
    pub ranking_profile: AppliedProfile,
    /// Why a fusion request degraded to a single leg
    pub fallback_reason: Option<String>,
    pub latency_ms: f64,
}
