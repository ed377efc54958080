//! simplesearch: hybrid search dispatcher
//!
//! Lets a client choose among three retrieval strategies over one document
//! collection:
//! - `bm25`: lexical retrieval only
//! - `semantic`: embed the query, then approximate nearest-neighbor search
//! - `fusion`: both, merged with Reciprocal Rank Fusion (RRF)
//!
//! The ranking engines (a Vespa query endpoint) and the embedding model (an
//! OpenAI-compatible HTTP endpoint) are external; this crate routes queries
//! to them, fuses their rankings and assembles a latency-annotated response.

pub mod config;
pub mod embedding;
pub mod error;
pub mod query;
pub mod retrieval;
pub mod server;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::SearchError;
pub use types::*;
