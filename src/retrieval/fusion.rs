//! Result fusion strategies
//!
//! Implements Reciprocal Rank Fusion (RRF) for combining the lexical and
//! semantic rankings of one query.

use crate::types::{DocumentId, FusedResult, ScoreList};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Reciprocal Rank Fusion (RRF) parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrfConfig {
    /// Smoothing constant k (default: 60).
    ///
    /// Rank 1 contributes `1/(k+1)`, rank 2 `1/(k+2)`; the larger k is, the
    /// less a top rank in one source outweighs agreement between sources.
    pub k: f64,
}

impl Default for RrfConfig {
    fn default() -> Self {
        Self { k: 60.0 }
    }
}

impl RrfConfig {
    pub fn with_k(k: f64) -> Self {
        Self { k }
    }

    /// Contribution of a document found at 1-based `rank` in one source
    pub fn contribution(&self, rank: usize) -> f64 {
        1.0 / (self.k + rank as f64)
    }
}

/// Compute Reciprocal Rank Fusion over several score lists
///
/// RRF score = Σ 1/(k + rank_s(d)) over every source s that returned d
///
/// Works on ranks rather than scores, so the incomparable native scales of
/// BM25 and vector similarity never need calibrating. Documents are merged
/// by `document_id`; the output is ordered by [`compare_fused`].
pub fn reciprocal_rank_fusion(lists: &[ScoreList], config: &RrfConfig) -> Vec<FusedResult> {
    let capacity = lists.iter().map(ScoreList::len).sum();
    let mut fused: HashMap<DocumentId, FusedResult> = HashMap::with_capacity(capacity);

    for list in lists {
        let source = list.source();
        for doc in list.iter() {
            let contribution = config.contribution(doc.rank);

            fused
                .entry(doc.document_id.clone())
                .and_modify(|result| {
                    result.fused_score += contribution;
                    result.contributing_ranks.insert(source, doc.rank);
                })
                .or_insert_with(|| FusedResult {
                    document_id: doc.document_id.clone(),
                    fused_score: contribution,
                    contributing_ranks: BTreeMap::from([(source, doc.rank)]),
                });
        }
    }

    let mut results: Vec<FusedResult> = fused.into_values().collect();
    results.sort_by(compare_fused);
    results
}

/// Rank a single source without fusion.
///
/// The list is already ordered by native score; its ranks carry over and the
/// native score stands in for the fused score.
pub fn single_source_ranking(list: &ScoreList) -> Vec<FusedResult> {
    list.iter()
        .map(|doc| FusedResult {
            document_id: doc.document_id.clone(),
            fused_score: doc.native_score,
            contributing_ranks: BTreeMap::from([(list.source(), doc.rank)]),
        })
        .collect()
}

/// Total order over fused results.
///
/// Descending score, then more contributing sources first (kept explicit so
/// floating-point equality can't demote an agreed-upon document), then
/// ascending `document_id`.
pub fn compare_fused(a: &FusedResult, b: &FusedResult) -> Ordering {
    b.fused_score
        .total_cmp(&a.fused_score)
        .then_with(|| b.source_count().cmp(&a.source_count()))
        .then_with(|| a.document_id.cmp(&b.document_id))
}
