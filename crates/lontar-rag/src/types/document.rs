//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Supported source file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document, loaded one Document per page
    Pdf,
    /// CSV file, loaded one Document per row
    Csv,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Csv => "CSV",
        }
    }
}

/// Source location of a document or chunk, used for citations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRef {
    /// Source filename
    pub filename: String,
    /// File type
    pub file_type: FileType,
    /// Page number (1-indexed, PDF only)
    pub page_number: Option<u32>,
    /// Total pages in the source file (PDF only)
    pub page_count: Option<u32>,
    /// Row number (1-indexed data row, CSV only)
    pub row_number: Option<u32>,
    /// Total data rows in the source file (CSV only)
    pub row_count: Option<u32>,
}

impl SourceRef {
    /// Create source info for one PDF page
    pub fn pdf(filename: String, page: u32, total_pages: u32) -> Self {
        Self {
            filename,
            file_type: FileType::Pdf,
            page_number: Some(page),
            page_count: Some(total_pages),
            row_number: None,
            row_count: None,
        }
    }

    /// Create source info for one CSV row
    pub fn csv(filename: String, row: u32, total_rows: u32) -> Self {
        Self {
            filename,
            file_type: FileType::Csv,
            page_number: None,
            page_count: None,
            row_number: Some(row),
            row_count: Some(total_rows),
        }
    }

    /// Format source for display in prompts and citations
    pub fn format_citation(&self) -> String {
        let mut parts = vec![self.filename.clone()];

        if let Some(page) = self.page_number {
            parts.push(format!("Page {}", page));
        }

        if let Some(row) = self.row_number {
            parts.push(format!("Row {}", row));
        }

        parts.join(", ")
    }
}

/// A unit of loaded content: one PDF page or one CSV row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Extracted text content
    pub content: String,
    /// Source location
    pub source: SourceRef,
    /// SHA-256 hash of the content
    pub content_hash: String,
    /// Load timestamp
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document
    pub fn new(content: String, source: SourceRef) -> Self {
        let content_hash = hash_content(&content);
        Self {
            id: Uuid::new_v4(),
            content,
            source,
            content_hash,
            loaded_at: chrono::Utc::now(),
        }
    }
}

/// A semantically coherent slice of a document, stored with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content
    pub content: String,
    /// Embedding vector (768 dimensions)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    /// Source location inherited from the parent document
    pub source: SourceRef,
    /// Chunk index within the parent document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk (embedding attached later by the writer)
    pub fn new(document_id: Uuid, content: String, source: SourceRef, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            embedding: Vec::new(),
            source,
            chunk_index,
        }
    }

    /// Flatten source metadata for vector store persistence
    pub fn to_metadata(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut meta = serde_json::Map::new();
        meta.insert("document_id".to_string(), json!(self.document_id.to_string()));
        meta.insert("filename".to_string(), json!(self.source.filename));
        meta.insert("file_type".to_string(), json!(self.source.file_type));
        meta.insert("chunk_index".to_string(), json!(self.chunk_index));

        if let Some(page) = self.source.page_number {
            meta.insert("page_number".to_string(), json!(page));
        }
        if let Some(row) = self.source.row_number {
            meta.insert("row_number".to_string(), json!(row));
        }

        meta
    }
}

/// SHA-256 hex digest of a text
pub fn hash_content(content: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_citation_includes_page() {
        let source = SourceRef::pdf("report.pdf".to_string(), 4, 12);
        assert_eq!(source.format_citation(), "report.pdf, Page 4");
    }

    #[test]
    fn csv_citation_includes_row() {
        let source = SourceRef::csv("inventory.csv".to_string(), 7, 100);
        assert_eq!(source.format_citation(), "inventory.csv, Row 7");
    }

    #[test]
    fn chunk_metadata_carries_source_fields() {
        let source = SourceRef::pdf("report.pdf".to_string(), 2, 5);
        let chunk = Chunk::new(Uuid::new_v4(), "text".to_string(), source, 0);
        let meta = chunk.to_metadata();

        assert_eq!(meta["filename"], json!("report.pdf"));
        assert_eq!(meta["file_type"], json!("pdf"));
        assert_eq!(meta["page_number"], json!(2));
        assert!(!meta.contains_key("row_number"));
    }

    #[test]
    fn identical_content_hashes_equal() {
        let a = Document::new(
            "same text".to_string(),
            SourceRef::csv("a.csv".to_string(), 1, 1),
        );
        let b = Document::new(
            "same text".to_string(),
            SourceRef::csv("b.csv".to_string(), 2, 2),
        );
        assert_eq!(a.content_hash, b.content_hash);
        assert_ne!(a.id, b.id);
    }
}
