//! Semantic chunking at an embedding-distance percentile breakpoint
//!
//! Consecutive sentences are grouped into one chunk until the cosine
//! distance between neighbouring sentence embeddings exceeds the
//! breakpoint threshold (the 95th percentile of all pairwise distances in
//! the document). Chunk boundaries never fall inside a sentence.

use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::similarity::{cosine_distance, percentile};
use crate::types::{Chunk, Document};

/// Splits documents into semantically coherent chunks
pub struct SemanticChunker {
    embedder: Arc<dyn EmbeddingProvider>,
    breakpoint_percentile: f64,
}

impl SemanticChunker {
    /// Create a new chunker
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: &ChunkingConfig) -> Self {
        Self {
            embedder,
            breakpoint_percentile: config.breakpoint_percentile,
        }
    }

    /// Chunk a batch of documents, preserving input order
    pub async fn split_documents(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        tracing::info!("Splitting {} documents...", documents.len());

        let mut chunks = Vec::new();
        for document in documents {
            chunks.extend(self.split_document(document).await?);
        }

        tracing::info!("Total chunks: {}", chunks.len());
        Ok(chunks)
    }

    /// Chunk a single document at semantic breakpoints
    pub async fn split_document(&self, document: &Document) -> Result<Vec<Chunk>> {
        let sentences = split_sentences(&document.content);

        // Nothing to compare against: the whole document is one chunk.
        if sentences.len() < 2 {
            if document.content.trim().is_empty() {
                return Ok(Vec::new());
            }
            return Ok(vec![Chunk::new(
                document.id,
                document.content.trim().to_string(),
                document.source.clone(),
                0,
            )]);
        }

        let embeddings = self.embedder.embed_batch(&sentences).await?;

        let distances: Vec<f32> = embeddings
            .windows(2)
            .map(|pair| cosine_distance(&pair[0], &pair[1]))
            .collect();

        let threshold = percentile(&distances, self.breakpoint_percentile);

        let mut chunks = Vec::new();
        let mut current = vec![sentences[0].as_str()];
        let mut chunk_index = 0u32;

        for (i, distance) in distances.iter().enumerate() {
            if *distance > threshold {
                chunks.push(Chunk::new(
                    document.id,
                    current.join(" ").trim().to_string(),
                    document.source.clone(),
                    chunk_index,
                ));
                chunk_index += 1;
                current = Vec::new();
            }
            current.push(sentences[i + 1].as_str());
        }

        if !current.is_empty() {
            chunks.push(Chunk::new(
                document.id,
                current.join(" ").trim().to_string(),
                document.source.clone(),
                chunk_index,
            ));
        }

        Ok(chunks)
    }
}

/// Split text into trimmed, non-empty sentences
fn split_sentences(text: &str) -> Vec<String> {
    text.split_sentence_bounds()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
