//! Provider abstractions for the three hosted services: embeddings,
//! chat completion, and vector storage.

pub mod astra;
pub mod embedding;
pub mod gemini;
pub mod groq;
pub mod llm;
pub mod vector_store;

pub use astra::AstraVectorStore;
pub use embedding::EmbeddingProvider;
pub use gemini::GeminiEmbedder;
pub use groq::GroqChat;
pub use llm::LlmProvider;
pub use vector_store::{ScoredChunk, VectorStoreProvider};
