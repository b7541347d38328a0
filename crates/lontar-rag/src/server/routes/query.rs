//! Query endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /api/query - Answer a question through the RAG pipeline
///
/// Always returns 200: empty input and internal failures surface as the
/// engine's fixed messages in the `answer` field.
pub async fn query_rag(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    let start = Instant::now();

    let answer = state.engine().answer(&request.question).await;

    Json(QueryResponse::new(
        answer,
        start.elapsed().as_millis() as u64,
    ))
}
