//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

/// Response to a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer (or a fixed fallback message)
    pub answer: String,
    /// Total processing time in milliseconds
    pub processing_time_ms: u64,
}

impl QueryResponse {
    /// Create a new query response
    pub fn new(answer: String, processing_time_ms: u64) -> Self {
        Self {
            answer,
            processing_time_ms,
        }
    }
}

/// Response to an ingest request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Vector store IDs assigned to the persisted chunks
    pub document_ids: Vec<String>,
    /// Source records loaded (PDF pages + CSV rows) before chunking
    pub documents_loaded: usize,
    /// Chunks written to the vector store
    pub chunks_written: usize,
    /// Total processing time in milliseconds
    pub processing_time_ms: u64,
}
