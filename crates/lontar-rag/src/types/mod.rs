//! Core types for documents, queries, and responses

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document, FileType, SourceRef};
pub use query::{IngestRequest, QueryRequest};
pub use response::{IngestResponse, QueryResponse};
