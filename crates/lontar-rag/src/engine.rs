//! RAG engine: the service context owning the provider handles and both
//! pipelines (ingestion and query).
//!
//! Constructed once at startup; the provider handles are read-only
//! collaborators afterwards. Shutdown is `Drop`: the providers hold only
//! HTTP clients, there is no local state to flush.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{IngestErrorPolicy, RagConfig};
use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::ingestion::{loader, SemanticChunker};
use crate::providers::{
    AstraVectorStore, EmbeddingProvider, GeminiEmbedder, GroqChat, LlmProvider,
    VectorStoreProvider,
};
use crate::retrieval::{MultiQueryRetriever, QueryExpander};
use crate::types::Document;

/// Fixed reply for empty or whitespace-only questions
pub const EMPTY_QUESTION_PROMPT: &str = "Please enter question";

/// Fixed reply when anything in the query pipeline fails
pub const GENERIC_ERROR_MESSAGE: &str = "Something Went Wrong";

/// Outcome of an ingestion run
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Vector store IDs assigned to the persisted chunks
    pub document_ids: Vec<String>,
    /// Source records loaded (PDF pages + CSV rows) before chunking
    pub documents_loaded: usize,
    /// Chunks written to the vector store
    pub chunks_written: usize,
}

/// The RAG service context
pub struct RagEngine {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
    chunker: SemanticChunker,
    expander: QueryExpander,
    retriever: MultiQueryRetriever,
}

impl RagEngine {
    /// Construct the engine with the hosted-service providers and make sure
    /// the vector collection exists.
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG engine...");

        let embedder = Arc::new(GeminiEmbedder::new(&config.embeddings)?);
        tracing::info!(
            "Embedding provider initialized ({}, {} dims)",
            config.embeddings.model,
            config.embeddings.dimensions
        );

        let llm = Arc::new(GroqChat::new(&config.llm)?);
        tracing::info!("Chat provider initialized ({})", config.llm.model);

        let store = AstraVectorStore::new(&config.astra)?;
        store.ensure_collection(config.embeddings.dimensions).await?;

        Ok(Self::with_providers(config, embedder, Arc::new(store), llm))
    }

    /// Construct the engine from already-built providers.
    ///
    /// This is the seam tests and alternative backends plug into.
    pub fn with_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let chunker = SemanticChunker::new(Arc::clone(&embedder), &config.chunking);
        let expander = QueryExpander::new(Arc::clone(&llm), &config.retrieval);
        let retriever = MultiQueryRetriever::new(
            Arc::clone(&embedder),
            Arc::clone(&vector_store),
            &config.retrieval,
        );

        Self {
            config,
            embedder,
            vector_store,
            llm,
            chunker,
            expander,
            retriever,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Answer a question.
    ///
    /// Empty input returns a fixed prompt string without touching any
    /// provider. Any internal failure is logged and converted to a fixed
    /// generic message; this method never returns an error and never panics.
    pub async fn answer(&self, question: &str) -> String {
        if question.trim().is_empty() {
            return EMPTY_QUESTION_PROMPT.to_string();
        }

        match self.answer_inner(question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Query pipeline failed: {}", e);
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// The expand -> retrieve -> generate chain
    async fn answer_inner(&self, question: &str) -> Result<String> {
        let start = Instant::now();
        tracing::info!("Query: \"{}\"", question);

        let queries = self.expander.expand(question).await?;
        let results = self.retriever.retrieve(&queries).await?;

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_answer_prompt(question, &context);

        let answer = self.llm.complete(&prompt).await?;

        tracing::info!(
            "Query completed in {}ms ({} chunks in context)",
            start.elapsed().as_millis(),
            results.len()
        );
        Ok(answer)
    }

    /// Ingest one PDF and one CSV file into the vector store.
    ///
    /// This is the top-level ingestion driver: every stage reports errors
    /// through `Result`, and the configured `IngestErrorPolicy` decides
    /// whether a failing document aborts the batch or is skipped. Loader
    /// failures always abort, since a missing input file cannot be skipped
    /// at document granularity.
    pub async fn ingest(&self, pdf_path: &Path, csv_path: &Path) -> Result<IngestReport> {
        let pdf_documents = loader::load_pdf(pdf_path)?;
        let csv_documents = loader::load_csv(csv_path)?;

        let mut documents = pdf_documents;
        documents.extend(csv_documents);
        let documents_loaded = documents.len();

        let mut chunks = self.split_with_policy(&documents).await?;
        tracing::info!("Saving {} chunks to vector store...", chunks.len());

        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&contents).await?;
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        let document_ids = self.vector_store.insert_chunks(&chunks).await?;
        tracing::info!("Total documents saved: {}", document_ids.len());

        Ok(IngestReport {
            document_ids,
            documents_loaded,
            chunks_written: chunks.len(),
        })
    }

    /// Chunk each document, applying the configured failure policy
    async fn split_with_policy(
        &self,
        documents: &[Document],
    ) -> Result<Vec<crate::types::Chunk>> {
        let mut chunks = Vec::new();

        for document in documents {
            match self.chunker.split_document(document).await {
                Ok(document_chunks) => chunks.extend(document_chunks),
                Err(e) if self.config.ingestion.on_error == IngestErrorPolicy::SkipDocument => {
                    tracing::warn!(
                        "Skipping document {} ({}): {}",
                        document.id,
                        document.source.format_citation(),
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(chunks)
    }
}
