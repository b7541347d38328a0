//! Vector store provider trait for persisting and searching embeddings

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Chunk;

/// Search result from the vector store
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matched chunk, with its stored embedding populated
    pub chunk: Chunk,
    /// Similarity score (0.0 to 1.0, higher is more similar)
    pub similarity: f32,
}

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `AstraVectorStore`: DataStax Astra DB Data API collection
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Persist chunks with their embeddings, returning the IDs the store assigned
    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<Vec<String>>;

    /// Fetch the `fetch_k` nearest chunks by embedding similarity,
    /// in descending relevance order, with stored vectors included
    async fn search(&self, query_embedding: &[f32], fetch_k: usize) -> Result<Vec<ScoredChunk>>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
