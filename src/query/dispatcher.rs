//! Profile-driven query dispatch
//!
//! `bm25` runs the lexical leg alone. `semantic` embeds the text and runs
//! the dense leg. `fusion` runs the lexical leg concurrently with
//! embed-then-dense, then merges both rankings with RRF. The whole dispatch
//! runs under one request budget; when it expires the in-flight calls are
//! dropped, not awaited.

use super::assembler::{ResultAssembler, Retrieval};
use super::builder::build_query;
use crate::config::{Config, FusionFallback, RetrievalConfig};
use crate::embedding::{init_embedding_service, EmbeddingService};
use crate::error::SearchError;
use crate::retrieval::{
    init_retrievers, reciprocal_rank_fusion, single_source_ranking, RetrieverQuery, RetrieverSet,
    RrfConfig,
};
use crate::types::{AppliedProfile, Query, RankingProfile, ResponseEnvelope, ScoreList, Source};
use crate::util::truncate_str;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Routes queries to retrievers according to their ranking profile
#[derive(Debug, Clone)]
pub struct QueryDispatcher {
    retrievers: RetrieverSet,
    embedder: Option<Arc<EmbeddingService>>,
    config: RetrievalConfig,
    rrf: RrfConfig,
    assembler: ResultAssembler,
}

impl QueryDispatcher {
    pub fn new(
        retrievers: RetrieverSet,
        embedder: Option<Arc<EmbeddingService>>,
        config: RetrievalConfig,
    ) -> Self {
        let rrf = RrfConfig::with_k(config.rrf_k);
        Self {
            retrievers,
            embedder,
            config,
            rrf,
            assembler: ResultAssembler::new(),
        }
    }

    /// Wire the dispatcher to the configured search backend and embedder
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let retrievers = init_retrievers(config)?;
        let embedder = init_embedding_service(config)?;
        Ok(Self::new(retrievers, embedder, config.retrieval.clone()))
    }

    /// Validate raw request fields and dispatch the resulting query
    pub async fn search(
        &self,
        text: &str,
        limit: Option<i64>,
        ranking: Option<&str>,
    ) -> Result<ResponseEnvelope, SearchError> {
        let query = build_query(text, limit, ranking, &self.config)?;
        self.dispatch(query).await
    }

    /// Run one query end to end: retrieval, fusion and assembly
    pub async fn dispatch(&self, query: Query) -> Result<ResponseEnvelope, SearchError> {
        let span = info_span!(
            "search",
            request_id = %Uuid::new_v4(),
            profile = %query.profile,
            limit = query.limit,
        );

        async move {
            let started = Instant::now();
            let budget = self.config.request_timeout();

            let outcome = match tokio::time::timeout(budget, self.retrieve(&query)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(SearchError::Timeout {
                    budget_ms: self.config.request_timeout_ms,
                }),
            };

            match outcome {
                Ok(retrieval) => {
                    let envelope = self.assembler.assemble(&query, retrieval, started);
                    info!(
                        "Search '{}' completed: profile={}, returned={}, total={}, latency={}ms",
                        truncate_str(&query.text, 60),
                        envelope.ranking_profile,
                        envelope.returned,
                        envelope.total_available,
                        envelope.latency_ms
                    );
                    Ok(envelope)
                }
                Err(e) => {
                    error!(code = e.code(), "Search failed: {}", e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn retrieve(&self, query: &Query) -> Result<Retrieval, SearchError> {
        match *query.profile.sources() {
            // Single-source profiles never fall back: semantic-only means semantic-only
            [source] => {
                let list = self.leg(source, &query.text, query.limit).await?;
                Ok(single_source(list, query.profile.into(), None))
            }
            _ => self.fuse(query).await,
        }
    }

    /// One retrieval leg; the semantic leg embeds the text first
    async fn leg(&self, source: Source, text: &str, limit: usize) -> Result<ScoreList, SearchError> {
        match source {
            Source::Lexical => self.lexical(text, limit).await,
            Source::Semantic => self.embed_then_semantic(text, limit).await,
        }
    }

    async fn fuse(&self, query: &Query) -> Result<Retrieval, SearchError> {
        let candidates = self.config.fusion_candidates(query.limit);
        debug!("Fusion over-fetch: {} candidates per leg", candidates);

        let lexical = self.leg(Source::Lexical, &query.text, candidates);
        let semantic = self.leg(Source::Semantic, &query.text, candidates);

        if self.config.fusion_fallback == FusionFallback::Fail {
            // First failure cancels the other leg
            let (lexical, semantic) = tokio::try_join!(lexical, semantic)?;
            return Ok(self.merge(lexical, semantic));
        }

        match tokio::join!(lexical, semantic) {
            (Ok(lexical), Ok(semantic)) => Ok(self.merge(lexical, semantic)),
            (Ok(lexical), Err(e)) => Ok(degrade(lexical, AppliedProfile::FusionLexicalFallback, e)),
            (Err(e), Ok(semantic)) => Ok(degrade(semantic, AppliedProfile::FusionSemanticFallback, e)),
            (Err(lexical_err), Err(semantic_err)) => {
                warn!("Both fusion legs failed; semantic leg: {}", semantic_err);
                Err(lexical_err)
            }
        }
    }

    fn merge(&self, lexical: ScoreList, semantic: ScoreList) -> Retrieval {
        let lists = vec![lexical, semantic];
        let ranking = reciprocal_rank_fusion(&lists, &self.rrf);
        Retrieval {
            lists,
            ranking,
            applied: AppliedProfile::Fusion,
            fallback_reason: None,
        }
    }

    async fn lexical(&self, text: &str, limit: usize) -> Result<ScoreList, SearchError> {
        let retriever = self.retrievers.get(Source::Lexical).ok_or_else(|| {
            SearchError::RetrieverUnavailable {
                retriever: Source::Lexical,
                message: "no lexical retriever configured".to_string(),
            }
        })?;

        retriever
            .search(RetrieverQuery::Text(text), limit)
            .await
            .map_err(|e| SearchError::from_retriever(Source::Lexical, e))
    }

    async fn embed_then_semantic(&self, text: &str, limit: usize) -> Result<ScoreList, SearchError> {
        let embedder = self.embedder.as_ref().ok_or_else(|| {
            SearchError::EmbeddingFailed("no embedding endpoint configured".to_string())
        })?;
        let retriever = self.retrievers.get(Source::Semantic).ok_or_else(|| {
            SearchError::RetrieverUnavailable {
                retriever: Source::Semantic,
                message: "no semantic retriever configured".to_string(),
            }
        })?;

        let vector = embedder.embed(text).await?;

        retriever
            .search(RetrieverQuery::Vector(&vector), limit)
            .await
            .map_err(|e| SearchError::from_retriever(Source::Semantic, e))
    }
}

fn single_source(list: ScoreList, applied: AppliedProfile, fallback_reason: Option<String>) -> Retrieval {
    let ranking = single_source_ranking(&list);
    Retrieval {
        lists: vec![list],
        ranking,
        applied,
        fallback_reason,
    }
}

/// Answer a fusion request from its surviving leg, unmodified
fn degrade(list: ScoreList, applied: AppliedProfile, cause: SearchError) -> Retrieval {
    warn!("Fusion degraded to {}: {}", applied, cause);
    single_source(list, applied, Some(cause.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::backend::{EmbeddingBackend, EmbeddingError, EmbeddingResult};
    use crate::retrieval::{Retriever, RetrieverError, RetrieverResult};
    use crate::types::{Embedding, ScoredDocument};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    // ========================================================================
    // Mocks
    // ========================================================================

    #[derive(Debug, Clone)]
    enum Behavior {
        Hits(Vec<(&'static str, f64)>),
        Unavailable(&'static str),
        Timeout,
    }

    #[derive(Debug)]
    struct MockRetriever {
        source: Source,
        behavior: Behavior,
        delay: Duration,
        limits: Mutex<Vec<usize>>,
    }

    impl MockRetriever {
        fn new(source: Source, behavior: Behavior) -> Self {
            Self {
                source,
                behavior,
                delay: Duration::ZERO,
                limits: Mutex::new(Vec::new()),
            }
        }

        fn hits(source: Source, hits: &[(&'static str, f64)]) -> Self {
            Self::new(source, Behavior::Hits(hits.to_vec()))
        }

        fn delayed(mut self, ms: u64) -> Self {
            self.delay = Duration::from_millis(ms);
            self
        }

        fn calls(&self) -> Vec<usize> {
            self.limits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Retriever for MockRetriever {
        fn source(&self) -> Source {
            self.source
        }

        async fn search(&self, query: RetrieverQuery<'_>, limit: usize) -> RetrieverResult<ScoreList> {
            match (self.source, query) {
                (Source::Lexical, RetrieverQuery::Text(_)) | (Source::Semantic, RetrieverQuery::Vector(_)) => {}
                _ => panic!("{} retriever got a {} query", self.source, query.kind()),
            }
            self.limits.lock().unwrap().push(limit);
            tokio::time::sleep(self.delay).await;

            match &self.behavior {
                Behavior::Hits(hits) => {
                    let docs = hits
                        .iter()
                        .map(|(id, score)| {
                            ScoredDocument::new(*id, *score).with_snippet(format!("{} text", id))
                        })
                        .collect::<Vec<_>>();
                    let total = docs.len() as u64;
                    let mut list = ScoreList::from_hits(self.source, docs, total);
                    if list.len() > limit {
                        let kept = list.documents()[..limit].to_vec();
                        list = ScoreList::from_hits(self.source, kept, total);
                    }
                    Ok(list)
                }
                Behavior::Unavailable(msg) => Err(RetrieverError::Unavailable(msg.to_string())),
                Behavior::Timeout => Err(RetrieverError::Timeout { timeout_ms: 2000 }),
            }
        }
    }

    #[derive(Debug)]
    struct MockEmbedder {
        fail: bool,
        delay: Duration,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingBackend for MockEmbedder {
        async fn embed(&self, _text: &str) -> EmbeddingResult<Embedding> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                Err(EmbeddingError::EmbeddingFailed("model offline".to_string()))
            } else {
                Ok(vec![0.6, 0.8])
            }
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct Harness {
        lexical: Arc<MockRetriever>,
        semantic: Arc<MockRetriever>,
        embedder: Arc<MockEmbedder>,
        config: RetrievalConfig,
    }

    impl Harness {
        fn new(lexical: MockRetriever, semantic: MockRetriever) -> Self {
            Self {
                lexical: Arc::new(lexical),
                semantic: Arc::new(semantic),
                embedder: Arc::new(MockEmbedder {
                    fail: false,
                    delay: Duration::ZERO,
                    calls: AtomicUsize::new(0),
                }),
                config: RetrievalConfig::default(),
            }
        }

        fn failing_embedder(mut self) -> Self {
            self.embedder = Arc::new(MockEmbedder {
                fail: true,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            });
            self
        }

        fn embed_delay(mut self, ms: u64) -> Self {
            self.embedder = Arc::new(MockEmbedder {
                fail: false,
                delay: Duration::from_millis(ms),
                calls: AtomicUsize::new(0),
            });
            self
        }

        fn dispatcher(&self) -> QueryDispatcher {
            let retrievers = RetrieverSet::new()
                .with(self.lexical.clone())
                .with(self.semantic.clone());
            let embedder = EmbeddingService::new(self.embedder.clone(), Duration::from_secs(1));
            QueryDispatcher::new(retrievers, Some(Arc::new(embedder)), self.config.clone())
        }

        fn embed_calls(&self) -> usize {
            self.embedder.calls.load(Ordering::SeqCst)
        }
    }

    fn reference_lists() -> Harness {
        Harness::new(
            MockRetriever::hits(Source::Lexical, &[("d1", 12.0), ("d2", 9.5)]),
            MockRetriever::hits(Source::Semantic, &[("d2", 0.91), ("d3", 0.87)]),
        )
    }

    fn ids(envelope: &ResponseEnvelope) -> Vec<&str> {
        envelope.hits.iter().map(|h| h.document_id.as_str()).collect()
    }

    fn query(profile: RankingProfile, limit: usize) -> Query {
        Query::new("hybrid search", profile, limit)
    }

    // ========================================================================
    // Single-source profiles
    // ========================================================================

    #[tokio::test]
    async fn test_bm25_skips_embedding() {
        let harness = reference_lists();
        let envelope = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Bm25, 10))
            .await
            .unwrap();

        assert_eq!(ids(&envelope), vec!["d1", "d2"]);
        assert_eq!(envelope.ranking_profile, AppliedProfile::Bm25);
        assert_eq!(envelope.hits[0].relevance, 12.0);
        assert_eq!(envelope.hits[0].matched_by, vec![Source::Lexical]);
        assert_eq!(harness.embed_calls(), 0);
        assert!(harness.semantic.calls().is_empty());
        assert_eq!(harness.lexical.calls(), vec![10]);
    }

    #[tokio::test]
    async fn test_each_profile_consults_exactly_its_sources() {
        for profile in [RankingProfile::Bm25, RankingProfile::Semantic, RankingProfile::Fusion] {
            let harness = reference_lists();
            let envelope = harness.dispatcher().dispatch(query(profile, 2)).await.unwrap();

            assert_eq!(envelope.ranking_profile, AppliedProfile::from(profile));
            let consulted: Vec<Source> = [
                (Source::Lexical, &harness.lexical),
                (Source::Semantic, &harness.semantic),
            ]
            .into_iter()
            .filter(|(_, retriever)| !retriever.calls().is_empty())
            .map(|(source, _)| source)
            .collect();
            assert_eq!(consulted, profile.sources(), "profile {}", profile);

            let embedded = profile.sources().contains(&Source::Semantic);
            assert_eq!(harness.embed_calls(), usize::from(embedded), "profile {}", profile);
        }
    }

    #[tokio::test]
    async fn test_bm25_without_embedder_configured() {
        let retrievers = RetrieverSet::new().with(Arc::new(MockRetriever::hits(
            Source::Lexical,
            &[("only", 1.0)],
        )));
        let dispatcher = QueryDispatcher::new(retrievers, None, RetrievalConfig::default());
        let envelope = dispatcher.dispatch(query(RankingProfile::Bm25, 5)).await.unwrap();
        assert_eq!(envelope.returned, 1);
    }

    #[tokio::test]
    async fn test_semantic_profile() {
        let harness = reference_lists();
        let envelope = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Semantic, 10))
            .await
            .unwrap();

        assert_eq!(ids(&envelope), vec!["d2", "d3"]);
        assert_eq!(envelope.ranking_profile, AppliedProfile::Semantic);
        assert_eq!(envelope.hits[0].relevance, 0.91);
        assert!(harness.lexical.calls().is_empty());
        assert_eq!(harness.embed_calls(), 1);
    }

    #[tokio::test]
    async fn test_semantic_embedding_failure_is_fatal() {
        let harness = reference_lists().failing_embedder();
        let err = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Semantic, 10))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "EMBEDDING_FAILED");
        assert!(harness.lexical.calls().is_empty());
        assert!(harness.semantic.calls().is_empty());
    }

    #[tokio::test]
    async fn test_semantic_without_embedder_configured() {
        let retrievers = RetrieverSet::new().with(Arc::new(MockRetriever::hits(
            Source::Semantic,
            &[("x", 0.5)],
        )));
        let dispatcher = QueryDispatcher::new(retrievers, None, RetrievalConfig::default());
        let err = dispatcher
            .dispatch(query(RankingProfile::Semantic, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::EmbeddingFailed(_)));
    }

    #[tokio::test]
    async fn test_single_source_retriever_failure_is_fatal() {
        let harness = Harness::new(
            MockRetriever::new(Source::Lexical, Behavior::Timeout),
            MockRetriever::hits(Source::Semantic, &[]),
        );
        let err = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Bm25, 10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SearchError::RetrieverTimeout {
                retriever: Source::Lexical,
                ..
            }
        ));
    }

    // ========================================================================
    // Fusion
    // ========================================================================

    #[tokio::test]
    async fn test_fusion_reference_scenario() {
        let harness = reference_lists();
        let envelope = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Fusion, 10))
            .await
            .unwrap();

        assert_eq!(ids(&envelope), vec!["d2", "d1", "d3"]);
        assert_eq!(envelope.ranking_profile, AppliedProfile::Fusion);
        assert_eq!(envelope.fallback_reason, None);
        assert_eq!(envelope.hits[0].relevance, 0.0325);
        assert_eq!(envelope.hits[1].relevance, 0.0164);
        assert_eq!(envelope.hits[2].relevance, 0.0161);
        assert_eq!(
            envelope.hits[0].matched_by,
            vec![Source::Lexical, Source::Semantic]
        );
        assert_eq!(envelope.total_available, 2);
    }

    #[tokio::test]
    async fn test_fusion_overfetches_each_leg() {
        let harness = reference_lists();
        harness
            .dispatcher()
            .dispatch(query(RankingProfile::Fusion, 4))
            .await
            .unwrap();

        assert_eq!(harness.lexical.calls(), vec![12]);
        assert_eq!(harness.semantic.calls(), vec![12]);
    }

    #[tokio::test]
    async fn test_fusion_truncates_to_limit() {
        let harness = Harness::new(
            MockRetriever::hits(
                Source::Lexical,
                &[("a", 5.0), ("b", 4.0), ("c", 3.0), ("d", 2.0)],
            ),
            MockRetriever::hits(Source::Semantic, &[("e", 0.9), ("f", 0.8), ("a", 0.7)]),
        );
        let envelope = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Fusion, 3))
            .await
            .unwrap();

        assert_eq!(envelope.returned, 3);
        assert_eq!(envelope.limit, 3);
        assert_eq!(ids(&envelope), vec!["a", "e", "b"]);
    }

    #[tokio::test]
    async fn test_fusion_degrades_when_embedding_fails() {
        let harness = reference_lists().failing_embedder();
        let envelope = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Fusion, 10))
            .await
            .unwrap();

        assert_eq!(envelope.ranking_profile, AppliedProfile::FusionLexicalFallback);
        assert_eq!(ids(&envelope), vec!["d1", "d2"]);
        assert_eq!(envelope.hits[0].relevance, 12.0);
        assert_eq!(envelope.hits[1].relevance, 9.5);
        let reason = envelope.fallback_reason.unwrap();
        assert!(reason.contains("model offline"), "unexpected reason: {}", reason);
        assert!(harness.semantic.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fusion_degrades_when_semantic_retriever_fails() {
        let harness = Harness::new(
            MockRetriever::hits(Source::Lexical, &[("d1", 1.0)]),
            MockRetriever::new(Source::Semantic, Behavior::Unavailable("ann index down")),
        );
        let envelope = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Fusion, 10))
            .await
            .unwrap();

        assert_eq!(envelope.ranking_profile, AppliedProfile::FusionLexicalFallback);
        assert!(envelope.fallback_reason.unwrap().contains("ann index down"));
    }

    #[tokio::test]
    async fn test_fusion_degrades_to_semantic_when_lexical_fails() {
        let harness = Harness::new(
            MockRetriever::new(Source::Lexical, Behavior::Unavailable("bm25 down")),
            MockRetriever::hits(Source::Semantic, &[("d3", 0.4), ("d2", 0.8)]),
        );
        let envelope = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Fusion, 10))
            .await
            .unwrap();

        assert_eq!(envelope.ranking_profile, AppliedProfile::FusionSemanticFallback);
        assert_eq!(ids(&envelope), vec!["d2", "d3"]);
        assert!(envelope.fallback_reason.unwrap().contains("bm25 down"));
    }

    #[tokio::test]
    async fn test_fusion_both_legs_failing_returns_lexical_error() {
        let harness = Harness::new(
            MockRetriever::new(Source::Lexical, Behavior::Unavailable("bm25 down")),
            MockRetriever::hits(Source::Semantic, &[]),
        )
        .failing_embedder();
        let err = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Fusion, 10))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SearchError::RetrieverUnavailable {
                retriever: Source::Lexical,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_fusion_fail_policy() {
        let mut harness = reference_lists().failing_embedder();
        harness.config.fusion_fallback = FusionFallback::Fail;
        let err = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Fusion, 10))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "EMBEDDING_FAILED");
    }

    #[tokio::test]
    async fn test_fusion_empty_result() {
        let harness = Harness::new(
            MockRetriever::hits(Source::Lexical, &[]),
            MockRetriever::hits(Source::Semantic, &[]),
        );
        let envelope = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Fusion, 10))
            .await
            .unwrap();

        assert!(envelope.hits.is_empty());
        assert_eq!(envelope.returned, 0);
        assert_eq!(envelope.total_available, 0);
        assert_eq!(envelope.ranking_profile, AppliedProfile::Fusion);
    }

    #[tokio::test]
    async fn test_fusion_is_deterministic() {
        let harness = reference_lists();
        let dispatcher = harness.dispatcher();
        let first = dispatcher.dispatch(query(RankingProfile::Fusion, 10)).await.unwrap();
        for _ in 0..10 {
            let again = dispatcher.dispatch(query(RankingProfile::Fusion, 10)).await.unwrap();
            assert_eq!(first.hits, again.hits);
        }
    }

    // ========================================================================
    // Concurrency and budget
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_fusion_runs_lexical_concurrently_with_embedding() {
        let harness = Harness::new(
            MockRetriever::hits(Source::Lexical, &[("d1", 1.0)]).delayed(100),
            MockRetriever::hits(Source::Semantic, &[("d2", 0.5)]).delayed(20),
        )
        .embed_delay(100);
        let dispatcher = harness.dispatcher();

        let start = tokio::time::Instant::now();
        let envelope = dispatcher.dispatch(query(RankingProfile::Fusion, 10)).await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(envelope.returned, 2);
        // Sequential execution would take 220ms
        assert!(elapsed < Duration::from_millis(150), "took {:?}", elapsed);
        assert!(elapsed >= Duration::from_millis(120), "took {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_budget_cancels_slow_legs() {
        let mut harness = Harness::new(
            MockRetriever::hits(Source::Lexical, &[("d1", 1.0)]).delayed(10_000),
            MockRetriever::hits(Source::Semantic, &[]),
        );
        harness.config.request_timeout_ms = 250;

        let start = tokio::time::Instant::now();
        let err = harness
            .dispatcher()
            .dispatch(query(RankingProfile::Bm25, 10))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Timeout { budget_ms: 250 }));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_search_validates_before_dispatch() {
        let harness = reference_lists();
        let err = harness.dispatcher().search("   ", None, None).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_QUERY");
        assert!(harness.lexical.calls().is_empty());

        let envelope = harness
            .dispatcher()
            .search(" hybrid ", Some(1), Some("fusion"))
            .await
            .unwrap();
        assert_eq!(envelope.query, "hybrid");
        assert_eq!(envelope.returned, 1);
    }
}
