//! lontar-rag: Retrieval-augmented document Q&A over PDF and CSV sources
//!
//! This crate ingests PDF pages and CSV rows, splits them into semantically
//! coherent chunks via an embedding-distance breakpoint, persists the chunks
//! in a hosted vector database, and answers questions through query
//! expansion, multi-query MMR retrieval, and LLM answer generation.

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod similarity;
pub mod types;

pub use config::RagConfig;
pub use engine::RagEngine;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, Document, FileType, SourceRef},
    query::QueryRequest,
    response::{IngestResponse, QueryResponse},
};
