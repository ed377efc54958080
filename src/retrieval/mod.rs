//! Hybrid retrieval
//!
//! Combines:
//! - BM25 lexical search (Vespa `userQuery()`)
//! - Dense vector search (Vespa `nearestNeighbor`)
//! - Reciprocal Rank Fusion (RRF) for merging the two rankings

mod fusion;
mod registry;
mod snippet;
mod traits;
mod vespa;

pub use fusion::*;
pub use registry::RetrieverSet;
pub use snippet::{collapse_whitespace, normalize_document_id, shorten, PLACEHOLDER};
pub use traits::*;
pub use vespa::{init_retrievers, LexicalRetriever, SemanticRetriever, VespaClient};
