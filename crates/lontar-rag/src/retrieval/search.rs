//! Multi-query retrieval with maximal marginal relevance selection
//!
//! Each expanded query fetches `fetch_k` candidates by similarity, then MMR
//! selects `top_k` of them, trading relevance against diversity:
//!
//! MMR = lambda * similarity(query, doc) - (1 - lambda) * max similarity(doc, selected)

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, ScoredChunk, VectorStoreProvider};
use crate::similarity::cosine_similarity;

/// Runs every expanded query against the vector store and concatenates results
pub struct MultiQueryRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    fetch_k: usize,
    top_k: usize,
    lambda: f32,
}

impl MultiQueryRetriever {
    /// Create a new retriever
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            fetch_k: config.fetch_k,
            top_k: config.top_k,
            lambda: config.lambda.clamp(0.0, 1.0),
        }
    }

    /// Retrieve chunks for every query, sequentially, concatenating the
    /// per-query selections.
    ///
    /// The concatenation is intentionally not deduplicated: a chunk that
    /// surfaces under several phrasings appears once per phrasing, which
    /// weights it more heavily in the assembled context.
    pub async fn retrieve(&self, queries: &[String]) -> Result<Vec<ScoredChunk>> {
        let mut all_results = Vec::new();

        for query in queries {
            let query_embedding = self.embedder.embed(query).await?;
            let candidates = self.store.search(&query_embedding, self.fetch_k).await?;
            let selected = mmr_select(candidates, self.top_k, self.lambda);

            tracing::debug!("Query \"{}\" selected {} chunks", query, selected.len());
            all_results.extend(selected);
        }

        tracing::info!(
            "Retrieved {} chunks across {} queries",
            all_results.len(),
            queries.len()
        );
        Ok(all_results)
    }
}

/// Select up to `k` results via maximal marginal relevance.
///
/// Relevance uses the store-reported similarity to the query; diversity is
/// cosine similarity between candidate vectors. Candidates arrive in
/// descending relevance order.
pub fn mmr_select(candidates: Vec<ScoredChunk>, k: usize, lambda: f32) -> Vec<ScoredChunk> {
    if candidates.is_empty() || k == 0 {
        return Vec::new();
    }

    let k = k.min(candidates.len());
    let mut selected: Vec<ScoredChunk> = Vec::with_capacity(k);
    let mut remaining = candidates;

    for _ in 0..k {
        if remaining.is_empty() {
            break;
        }

        let mut best_idx = 0;
        let mut best_mmr = f32::NEG_INFINITY;

        for (idx, candidate) in remaining.iter().enumerate() {
            let max_similarity = selected
                .iter()
                .map(|s| cosine_similarity(&candidate.chunk.embedding, &s.chunk.embedding))
                .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .unwrap_or(0.0);

            let mmr_score = lambda * candidate.similarity - (1.0 - lambda) * max_similarity;

            if mmr_score > best_mmr {
                best_mmr = mmr_score;
                best_idx = idx;
            }
        }

        selected.push(remaining.remove(best_idx));
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, SourceRef};
    use uuid::Uuid;

    fn candidate(tag: &str, similarity: f32, vector: Vec<f32>) -> ScoredChunk {
        let mut chunk = Chunk::new(
            Uuid::new_v4(),
            tag.to_string(),
            SourceRef::pdf("doc.pdf".to_string(), 1, 1),
            0,
        );
        chunk.embedding = vector;
        ScoredChunk { chunk, similarity }
    }

    #[test]
    fn empty_candidates_select_nothing() {
        assert!(mmr_select(Vec::new(), 3, 0.5).is_empty());
    }

    #[test]
    fn returns_at_most_k_results() {
        let candidates = vec![
            candidate("a", 0.9, vec![0.9, 0.1, 0.0]),
            candidate("b", 0.8, vec![0.8, 0.2, 0.0]),
            candidate("c", 0.7, vec![0.7, 0.3, 0.0]),
            candidate("d", 0.6, vec![0.6, 0.4, 0.0]),
        ];

        assert_eq!(mmr_select(candidates, 3, 0.5).len(), 3);
    }

    #[test]
    fn pure_relevance_preserves_order() {
        let candidates = vec![
            candidate("a", 0.9, vec![0.9, 0.1]),
            candidate("b", 0.85, vec![0.88, 0.12]),
            candidate("c", 0.5, vec![0.5, 0.5]),
        ];

        let selected = mmr_select(candidates, 3, 1.0);

        assert_eq!(selected[0].chunk.content, "a");
        assert_eq!(selected[1].chunk.content, "b");
        assert_eq!(selected[2].chunk.content, "c");
    }

    #[test]
    fn balanced_lambda_promotes_diversity() {
        // Two near-duplicates and one orthogonal result. With lambda 0.5
        // the orthogonal chunk beats the duplicate for the second slot.
        let candidates = vec![
            candidate("top", 0.95, vec![0.99, 0.01, 0.0]),
            candidate("duplicate", 0.94, vec![0.98, 0.02, 0.0]),
            candidate("diverse", 0.7, vec![0.0, 0.0, 1.0]),
        ];

        let selected = mmr_select(candidates, 2, 0.5);

        assert_eq!(selected[0].chunk.content, "top");
        assert_eq!(selected[1].chunk.content, "diverse");
    }

    #[test]
    fn k_larger_than_candidates_returns_all() {
        let candidates = vec![candidate("only", 0.9, vec![1.0, 0.0])];
        assert_eq!(mmr_select(candidates, 10, 0.5).len(), 1);
    }

    #[test]
    fn missing_vectors_fall_back_to_relevance() {
        let candidates = vec![
            candidate("a", 0.9, Vec::new()),
            candidate("b", 0.8, Vec::new()),
        ];

        let selected = mmr_select(candidates, 2, 0.5);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].chunk.content, "a");
    }
}
