//! Request validation

use crate::config::RetrievalConfig;
use crate::error::SearchError;
use crate::types::{Query, RankingProfile};

/// Validate raw request fields into a [`Query`].
///
/// Rejects empty (after trimming) or oversized text and unknown ranking
/// profiles before anything is dispatched. An absent ranking means `bm25`.
/// Out-of-range limits are clamped into `[1, max_limit]` rather than
/// rejected; an absent limit uses `default_limit`.
pub fn build_query(
    text: &str,
    limit: Option<i64>,
    ranking: Option<&str>,
    config: &RetrievalConfig,
) -> Result<Query, SearchError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SearchError::InvalidQuery(
            "Query must not be empty.".to_string(),
        ));
    }
    if text.len() > config.max_query_length {
        return Err(SearchError::InvalidQuery(format!(
            "Query is {} bytes long; the maximum is {}",
            text.len(),
            config.max_query_length
        )));
    }

    let profile = match ranking.map(str::trim).filter(|r| !r.is_empty()) {
        Some(name) => name
            .parse::<RankingProfile>()
            .map_err(SearchError::InvalidQuery)?,
        None => RankingProfile::default(),
    };

    Ok(Query::new(text, profile, config.clamp_limit(limit)))
}
