//! Ingest endpoint

use axum::{extract::State, Json};
use std::path::Path;
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{IngestRequest, IngestResponse};

/// POST /api/ingest - Load a PDF and a CSV into the vector store
///
/// Unlike the query endpoint this is an operator surface, so errors keep
/// their diagnostic detail and map to structured error responses.
pub async fn ingest_files(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>> {
    let start = Instant::now();

    let report = state
        .engine()
        .ingest(Path::new(&request.pdf_path), Path::new(&request.csv_path))
        .await?;

    Ok(Json(IngestResponse {
        document_ids: report.document_ids,
        documents_loaded: report.documents_loaded,
        chunks_written: report.chunks_written,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
