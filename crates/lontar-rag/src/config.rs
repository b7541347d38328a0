//! Configuration for the RAG system

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Chat model configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Vector database configuration
    #[serde(default)]
    pub astra: AstraConfig,
    /// Semantic chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Query expansion and retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Ingestion configuration
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

impl RagConfig {
    /// Build a configuration from the process environment.
    ///
    /// All service credentials are required and validated here, at startup,
    /// so a missing variable fails before the first provider call instead
    /// of surfacing as an opaque HTTP error mid-request.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.embeddings.api_key = require_env("GOOGLE_APIKEY")?;
        config.llm.api_key = require_env("GROQ_APIKEY")?;
        config.astra.token = require_env("ASTRADB_APIKEY")?;
        config.astra.endpoint = require_env("ASTRADB_ENDPOINT")?;

        if let Ok(collection) = std::env::var("ASTRADB_COLLECTION") {
            config.astra.collection = collection;
        }
        if let Ok(keyspace) = std::env::var("ASTRADB_NAMESPACE") {
            config.astra.keyspace = keyspace;
        }

        Ok(config)
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("Missing required environment variable: {}", name)))
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Embedding service configuration (Google Generative Language API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// API key for the embedding service
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for text-embedding-004)
    pub dimensions: usize,
    /// Maximum texts per batch request
    pub batch_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "text-embedding-004".to_string(),
            dimensions: 768,
            batch_size: 100,
            timeout_secs: 60,
        }
    }
}

/// Chat model configuration (Groq, OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the chat model
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "gemma2-9b-it".to_string(),
            temperature: 0.0,
            max_tokens: 1024,
            timeout_secs: 60,
        }
    }
}

/// Vector database configuration (Astra DB Data API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstraConfig {
    /// Database API endpoint, e.g. "https://<id>-<region>.apps.astra.datastax.com"
    pub endpoint: String,
    /// Application token
    #[serde(default, skip_serializing)]
    pub token: String,
    /// Keyspace (namespace) holding the collection
    pub keyspace: String,
    /// Collection name
    pub collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AstraConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: String::new(),
            keyspace: "default_keyspace".to_string(),
            collection: "first_vector_db".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Semantic chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Percentile of pairwise sentence distances used as the breakpoint
    /// threshold. Distances above it become chunk boundaries.
    pub breakpoint_percentile: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            breakpoint_percentile: 95.0,
        }
    }
}

/// Query expansion and retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of paraphrase variants requested from the chat model
    /// (on top of the translated original)
    pub expansion_variants: usize,
    /// Target language for translation and paraphrasing
    pub target_language: String,
    /// Candidates fetched from the vector store per expanded query
    pub fetch_k: usize,
    /// Results selected per expanded query after MMR
    pub top_k: usize,
    /// MMR lambda: 1.0 = pure relevance, 0.0 = pure diversity
    pub lambda: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            expansion_variants: 3,
            target_language: "Indonesian".to_string(),
            fetch_k: 20,
            top_k: 3,
            lambda: 0.5,
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// What the ingestion driver does when a single document fails
    #[serde(default)]
    pub on_error: IngestErrorPolicy,
}

/// Batch behavior when one document fails during chunking or embedding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestErrorPolicy {
    /// First failure aborts the whole batch (fail fast, no partial ingest)
    #[default]
    AbortBatch,
    /// Log the failing document and continue with the rest
    SkipDocument,
}
