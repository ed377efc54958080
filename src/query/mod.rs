//! Query validation, dispatch and result assembly
//!
//! A request becomes a validated [`Query`](crate::types::Query), the
//! dispatcher routes it to the retrievers its profile names, and the
//! assembler turns the ranking into a response envelope.

mod assembler;
mod builder;
mod dispatcher;

pub use assembler::{ResultAssembler, Retrieval};
pub use builder::build_query;
pub use dispatcher::QueryDispatcher;
