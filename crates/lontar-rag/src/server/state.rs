//! Application state for the RAG server

use std::sync::Arc;

use crate::engine::RagEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RagEngine>,
}

impl AppState {
    /// Wrap an engine for sharing across request handlers
    pub fn new(engine: RagEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Get the engine
    pub fn engine(&self) -> &RagEngine {
        &self.engine
    }
}
