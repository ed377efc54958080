//! Profile-keyed lookup of retriever adapters

use super::traits::Retriever;
use crate::types::Source;
use std::collections::HashMap;
use std::sync::Arc;

/// The retrievers available to the dispatcher, keyed by source
#[derive(Debug, Clone, Default)]
pub struct RetrieverSet {
    retrievers: HashMap<Source, Arc<dyn Retriever>>,
}

impl RetrieverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a retriever under its own source, replacing any previous one
    pub fn with(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.insert(retriever);
        self
    }

    pub fn insert(&mut self, retriever: Arc<dyn Retriever>) {
        self.retrievers.insert(retriever.source(), retriever);
    }

    pub fn get(&self, source: Source) -> Option<&Arc<dyn Retriever>> {
        self.retrievers.get(&source)
    }
}
