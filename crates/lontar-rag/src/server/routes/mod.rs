//! API route definitions

pub mod ingest;
pub mod query;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Build the /api router
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::query_rag))
        .route("/ingest", post(ingest::ingest_files))
}
