//! Response assembly

use crate::types::{
    AppliedProfile, FusedResult, Hit, Query, ResponseEnvelope, ScoreList, ScoredDocument,
};
use std::time::Instant;

/// Everything the retrieval phase produced for one query
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Lists that contributed, in presentation-precedence order (lexical first)
    pub lists: Vec<ScoreList>,
    /// Fused or single-source ranking, best first
    pub ranking: Vec<FusedResult>,
    /// Profile actually applied
    pub applied: AppliedProfile,
    /// Why a fusion request degraded, if it did
    pub fallback_reason: Option<String>,
}

/// Converts a ranking into the externally visible response shape
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAssembler;

impl ResultAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Truncate to the query limit, resolve presentable fields and stamp the
    /// latency measured from `started`.
    pub fn assemble(&self, query: &Query, retrieval: Retrieval, started: Instant) -> ResponseEnvelope {
        let Retrieval {
            lists,
            ranking,
            applied,
            fallback_reason,
        } = retrieval;

        let total_available = lists
            .iter()
            .map(ScoreList::total_available)
            .max()
            .unwrap_or(0);

        let hits: Vec<Hit> = ranking
            .into_iter()
            .take(query.limit)
            .map(|fused| present(&lists, fused))
            .collect();

        ResponseEnvelope {
            query: query.text.clone(),
            returned: hits.len(),
            hits,
            total_available,
            limit: query.limit,
            ranking_profile: applied,
            fallback_reason,
            latency_ms: round_to(started.elapsed().as_secs_f64() * 1000.0, 3),
        }
    }
}

/// Resolve a fused entry against the first list (in precedence order) that
/// returned it.
fn present(lists: &[ScoreList], fused: FusedResult) -> Hit {
    let document: Option<&ScoredDocument> = lists.iter().find_map(|l| l.find(&fused.document_id));
    let matched_by = fused.contributing_ranks.keys().copied().collect();
    let relevance = round_to(fused.fused_score, 4);

    match document {
        Some(doc) => Hit {
            id: doc.display_id.clone(),
            document_id: fused.document_id,
            url: doc.url.clone(),
            text: doc.text.clone(),
            snippet: doc.snippet.clone(),
            relevance,
            matched_by,
        },
        None => Hit {
            id: None,
            document_id: fused.document_id,
            url: None,
            text: None,
            snippet: String::new(),
            relevance,
            matched_by,
        },
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
