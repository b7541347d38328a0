//! Astra DB Data API vector store provider
//!
//! Persists chunks as JSON documents with a `$vector` field and searches
//! them with `$vector`-sorted `find` commands.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

use crate::config::AstraConfig;
use crate::error::{Error, Result};
use crate::providers::vector_store::{ScoredChunk, VectorStoreProvider};
use crate::types::{Chunk, FileType, SourceRef};

/// The Data API caps insertMany batches at 20 documents per request
const INSERT_BATCH_SIZE: usize = 20;

/// Vector store backed by an Astra DB Data API collection
pub struct AstraVectorStore {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    keyspace: String,
    collection: String,
}

impl AstraVectorStore {
    /// Create a new vector store client from configuration
    pub fn new(config: &AstraConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::VectorDb(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            keyspace: config.keyspace.clone(),
            collection: config.collection.clone(),
        })
    }

    fn keyspace_url(&self) -> String {
        format!("{}/api/json/v1/{}", self.endpoint, self.keyspace)
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.keyspace_url(), self.collection)
    }

    /// Create the collection with a cosine vector index if it does not exist.
    ///
    /// createCollection is idempotent for matching options, so this is safe
    /// to call on every startup.
    pub async fn ensure_collection(&self, dimensions: usize) -> Result<()> {
        let command = json!({
            "createCollection": {
                "name": self.collection,
                "options": {
                    "vector": {
                        "dimension": dimensions,
                        "metric": "cosine",
                    }
                }
            }
        });

        self.execute(&self.keyspace_url(), &command).await?;
        tracing::info!(
            "Astra collection '{}' ready ({} dimensions)",
            self.collection,
            dimensions
        );
        Ok(())
    }

    /// Send one Data API command and surface command-level errors.
    ///
    /// The Data API reports command failures in an `errors` array, often
    /// with HTTP 200, so both layers are checked here.
    async fn execute(&self, url: &str, command: &serde_json::Value) -> Result<ApiResponse> {
        let response = self
            .client
            .post(url)
            .header("Token", &self.token)
            .json(command)
            .send()
            .await
            .map_err(|e| Error::VectorDb(format!("Astra request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorDb(format!(
                "Astra request failed ({}): {}",
                status, body
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorDb(format!("Failed to parse Astra response: {}", e)))?;

        if let Some(errors) = &api_response.errors {
            if let Some(first) = errors.first() {
                return Err(Error::VectorDb(format!(
                    "Astra command failed ({}): {}",
                    first.error_code, first.message
                )));
            }
        }

        Ok(api_response)
    }

    /// Convert a stored document back into a chunk, or skip it with a warning
    fn document_to_chunk(value: serde_json::Value) -> Option<ScoredChunk> {
        let stored: StoredDocument = match serde_json::from_value(value) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Skipping malformed stored chunk: {}", e);
                return None;
            }
        };

        let source = SourceRef {
            filename: stored.filename,
            file_type: stored.file_type?,
            page_number: stored.page_number,
            page_count: None,
            row_number: stored.row_number,
            row_count: None,
        };

        let chunk = Chunk {
            id: Uuid::parse_str(&stored.id).unwrap_or_else(|_| Uuid::new_v4()),
            document_id: stored.document_id.unwrap_or_else(Uuid::new_v4),
            content: stored.content,
            embedding: stored.vector,
            source,
            chunk_index: stored.chunk_index,
        };

        Some(ScoredChunk {
            chunk,
            similarity: stored.similarity,
        })
    }
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Option<FindData>,
    #[serde(default)]
    status: Option<ApiStatus>,
    #[serde(default)]
    errors: Option<Vec<ApiError>>,
}

#[derive(serde::Deserialize)]
struct FindData {
    #[serde(default)]
    documents: Vec<serde_json::Value>,
}

#[derive(serde::Deserialize)]
struct ApiStatus {
    #[serde(rename = "insertedIds", default)]
    inserted_ids: Vec<serde_json::Value>,
}

#[derive(serde::Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(rename = "errorCode", default)]
    error_code: String,
}

#[derive(serde::Deserialize)]
struct StoredDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    content: String,
    #[serde(rename = "$vector", default)]
    vector: Vec<f32>,
    #[serde(rename = "$similarity", default)]
    similarity: f32,
    #[serde(default)]
    document_id: Option<Uuid>,
    #[serde(default)]
    filename: String,
    #[serde(default)]
    file_type: Option<FileType>,
    #[serde(default)]
    page_number: Option<u32>,
    #[serde(default)]
    row_number: Option<u32>,
    #[serde(default)]
    chunk_index: u32,
}

#[async_trait]
impl VectorStoreProvider for AstraVectorStore {
    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<Vec<String>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let mut inserted_ids = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(INSERT_BATCH_SIZE) {
            let documents: Vec<serde_json::Value> = batch
                .iter()
                .map(|chunk| {
                    if chunk.embedding.is_empty() {
                        return Err(Error::VectorDb(format!(
                            "Chunk {} has no embedding",
                            chunk.id
                        )));
                    }

                    let mut doc = serde_json::Map::new();
                    doc.insert("_id".to_string(), json!(chunk.id.to_string()));
                    doc.insert("content".to_string(), json!(chunk.content));
                    doc.insert("$vector".to_string(), json!(chunk.embedding));
                    doc.extend(chunk.to_metadata());
                    Ok(serde_json::Value::Object(doc))
                })
                .collect::<Result<_>>()?;

            let command = json!({
                "insertMany": {
                    "documents": documents,
                    "options": { "ordered": true }
                }
            });

            let response = self.execute(&self.collection_url(), &command).await?;

            let ids = response
                .status
                .ok_or_else(|| Error::VectorDb("insertMany returned no status".to_string()))?
                .inserted_ids;

            inserted_ids.extend(ids.into_iter().map(|id| match id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }));
        }

        Ok(inserted_ids)
    }

    async fn search(&self, query_embedding: &[f32], fetch_k: usize) -> Result<Vec<ScoredChunk>> {
        let command = json!({
            "find": {
                "sort": { "$vector": query_embedding },
                "projection": {
                    "$vector": 1,
                    "content": 1,
                    "document_id": 1,
                    "filename": 1,
                    "file_type": 1,
                    "page_number": 1,
                    "row_number": 1,
                    "chunk_index": 1,
                },
                "options": {
                    "limit": fetch_k,
                    "includeSimilarity": true,
                }
            }
        });

        let response = self.execute(&self.collection_url(), &command).await?;

        let documents = response
            .data
            .map(|d| d.documents)
            .unwrap_or_default();

        Ok(documents
            .into_iter()
            .filter_map(Self::document_to_chunk)
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        let command = json!({ "findCollections": {} });
        self.execute(&self.keyspace_url(), &command).await?;
        Ok(true)
    }

    fn name(&self) -> &str {
        "astra"
    }
}
