//! Request types for the HTTP API

use serde::{Deserialize, Serialize};

/// Query request for the RAG pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Ingest request: one PDF and one CSV to load into the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Path to the PDF file
    pub pdf_path: String,
    /// Path to the CSV file
    pub csv_path: String,
}
