//! Query embedding for the `semantic` and `fusion` profiles
//!
//! ```toml
//! [embedding]
//! endpoint = "http://localhost:1234/v1/embeddings"
//! model = "nomic-embed-text-v1.5"
//! dimensions = 768
//! timeout_ms = 1500
//! ```
//!
//! With no `endpoint` the dispatcher runs without an embedder; `bm25` is
//! unaffected.

pub mod backend;
mod service;

pub use service::{init_embedding_service, EmbeddingService};
