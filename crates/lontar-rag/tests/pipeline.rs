//! End-to-end pipeline tests over RagEngine with mock providers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use lontar_rag::config::RagConfig;
use lontar_rag::engine::{RagEngine, EMPTY_QUESTION_PROMPT, GENERIC_ERROR_MESSAGE};
use lontar_rag::error::{Error, Result};
use lontar_rag::ingestion::SemanticChunker;
use lontar_rag::providers::{EmbeddingProvider, LlmProvider, ScoredChunk, VectorStoreProvider};
use lontar_rag::types::{Chunk, Document, SourceRef};

/// Embedder producing a deterministic vector per text, counting calls
struct MockEmbedder {
    calls: AtomicUsize,
}

impl MockEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let seed = text.len() as f32;
        Ok(vec![seed, 1.0, 0.5])
    }

    fn dimensions(&self) -> usize {
        3
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock-embedder"
    }
}

/// Vector store returning a fixed result set for every search
struct MockStore {
    results: Vec<ScoredChunk>,
    searches: AtomicUsize,
    inserts: AtomicUsize,
}

impl MockStore {
    fn with_results(results: Vec<ScoredChunk>) -> Self {
        Self {
            results,
            searches: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
        }
    }

    fn empty() -> Self {
        Self::with_results(Vec::new())
    }

    fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStoreProvider for MockStore {
    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<Vec<String>> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(chunks.iter().map(|c| c.id.to_string()).collect())
    }

    async fn search(&self, _query_embedding: &[f32], _fetch_k: usize) -> Result<Vec<ScoredChunk>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock-store"
    }
}

/// Chat model that answers the expansion prompt with scripted JSON and the
/// answer prompt with a scripted reply, counting calls
struct MockLlm {
    expansion_reply: String,
    answer_reply: String,
    calls: AtomicUsize,
}

impl MockLlm {
    fn new(expansion_reply: &str, answer_reply: &str) -> Self {
        Self {
            expansion_reply: expansion_reply.to_string(),
            answer_reply: answer_reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // The expansion prompt asks for JSON; the answer prompt carries the
        // retrieved-context block.
        if prompt.contains("Respond with a JSON object") {
            Ok(self.expansion_reply.clone())
        } else {
            Ok(self.answer_reply.clone())
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock-llm"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

/// Chat model that always fails
struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(Error::llm("service unavailable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing-llm"
    }

    fn model(&self) -> &str {
        "failing-model"
    }
}

fn scored_chunk(content: &str, similarity: f32, vector: Vec<f32>) -> ScoredChunk {
    let mut chunk = Chunk::new(
        Uuid::new_v4(),
        content.to_string(),
        SourceRef::pdf("doc.pdf".to_string(), 1, 1),
        0,
    );
    chunk.embedding = vector;
    ScoredChunk { chunk, similarity }
}

fn engine_with(
    embedder: Arc<MockEmbedder>,
    store: Arc<MockStore>,
    llm: Arc<dyn LlmProvider>,
) -> RagEngine {
    RagEngine::with_providers(RagConfig::default(), embedder, store, llm)
}

const EXPANSION_TWO_QUERIES: &str =
    r#"{"answers": ["Apa ibu kota Prancis?", "Ibu kota negara Prancis?"]}"#;

#[tokio::test]
async fn empty_question_returns_fixed_prompt_without_provider_calls() {
    let embedder = Arc::new(MockEmbedder::new());
    let store = Arc::new(MockStore::empty());
    let llm = Arc::new(MockLlm::new(EXPANSION_TWO_QUERIES, "answer"));

    let llm_dyn: Arc<dyn LlmProvider> = llm.clone();
    let engine = engine_with(Arc::clone(&embedder), Arc::clone(&store), llm_dyn);

    assert_eq!(engine.answer("").await, EMPTY_QUESTION_PROMPT);
    assert_eq!(engine.answer("   \n\t ").await, EMPTY_QUESTION_PROMPT);

    assert_eq!(embedder.call_count(), 0);
    assert_eq!(store.search_count(), 0);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn internal_failure_returns_generic_message() {
    let engine = engine_with(
        Arc::new(MockEmbedder::new()),
        Arc::new(MockStore::empty()),
        Arc::new(FailingLlm),
    );

    assert_eq!(
        engine.answer("What is the capital of France?").await,
        GENERIC_ERROR_MESSAGE
    );
}

#[tokio::test]
async fn malformed_expansion_surfaces_as_generic_message() {
    let llm = Arc::new(MockLlm::new("I cannot produce JSON, sorry.", "answer"));
    let engine = engine_with(
        Arc::new(MockEmbedder::new()),
        Arc::new(MockStore::empty()),
        llm,
    );

    assert_eq!(
        engine.answer("What is the capital of France?").await,
        GENERIC_ERROR_MESSAGE
    );
}

#[tokio::test]
async fn one_search_per_expanded_query() {
    let embedder = Arc::new(MockEmbedder::new());
    let store = Arc::new(MockStore::empty());
    let llm = Arc::new(MockLlm::new(
        EXPANSION_TWO_QUERIES,
        "Paris adalah ibu kota Prancis.",
    ));

    let engine = engine_with(Arc::clone(&embedder), Arc::clone(&store), llm);
    engine.answer("What is the capital of France?").await;

    assert_eq!(store.search_count(), 2);
    // One query embedding per expanded variant, nothing else.
    assert_eq!(embedder.call_count(), 2);
}

#[tokio::test]
async fn duplicate_chunks_across_queries_are_not_deduplicated() {
    // Both expanded queries retrieve the same single stored chunk. MMR
    // selects it for each query; the concatenated context must carry it
    // twice.
    let repeated = scored_chunk("Paris is the capital of France.", 0.95, vec![1.0, 0.0, 0.0]);
    let store = Arc::new(MockStore::with_results(vec![repeated]));
    let llm = Arc::new(MockLlm::new(EXPANSION_TWO_QUERIES, "final answer"));

    let engine = engine_with(Arc::new(MockEmbedder::new()), store, llm);

    // Drive the retriever through the full answer path, then inspect the
    // retriever output directly for the ordering contract.
    let answer = engine.answer("What is the capital of France?").await;
    assert_eq!(answer, "final answer");

    let queries = vec!["q satu".to_string(), "q dua".to_string()];
    let retriever = lontar_rag::retrieval::MultiQueryRetriever::new(
        Arc::new(MockEmbedder::new()),
        Arc::new(MockStore::with_results(vec![scored_chunk(
            "Paris is the capital of France.",
            0.95,
            vec![1.0, 0.0, 0.0],
        )])),
        &RagConfig::default().retrieval,
    );

    let results = retriever.retrieve(&queries).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.content, results[1].chunk.content);
}

#[tokio::test]
async fn empty_retrieval_context_still_answers() {
    let llm = Arc::new(MockLlm::new(
        EXPANSION_TWO_QUERIES,
        "France's capital is Paris, though no documents mention it.",
    ));
    let engine = engine_with(Arc::new(MockEmbedder::new()), Arc::new(MockStore::empty()), llm);

    let answer = engine.answer("What is the capital of France?").await;

    assert!(!answer.is_empty());
    assert_ne!(answer, GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn pdf_pages_plus_csv_rows_equal_source_count_before_splitting() {
    // Three PDF pages and two CSV rows, one sentence each, so every source
    // record maps to exactly one chunk and the source count is visible in
    // the chunker output.
    let mut documents: Vec<Document> = (1..=3)
        .map(|page| {
            Document::new(
                format!("Halaman {} berisi teks.", page),
                SourceRef::pdf("laporan.pdf".to_string(), page, 3),
            )
        })
        .collect();

    for row in 1..=2 {
        documents.push(Document::new(
            format!("kota: Kota {}", row),
            SourceRef::csv("kota.csv".to_string(), row, 2),
        ));
    }

    let chunker = SemanticChunker::new(
        Arc::new(MockEmbedder::new()),
        &RagConfig::default().chunking,
    );
    let chunks = chunker.split_documents(&documents).await.unwrap();

    let distinct_sources: std::collections::HashSet<String> = chunks
        .iter()
        .map(|c| c.source.format_citation())
        .collect();

    assert_eq!(distinct_sources.len(), 3 + 2);
}
