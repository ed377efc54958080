//! Embedding backends
//!
//! The dispatcher only sees [`EmbeddingBackend`]. The shipped implementation
//! speaks the OpenAI embeddings wire format, which OpenAI, Azure, vLLM,
//! LM Studio, Ollama and text-embeddings-inference all accept.

mod openai;
mod traits;

pub use openai::OpenAiBackend;
pub use traits::{EmbeddingBackend, EmbeddingError, EmbeddingResult};
