//! RAG Server binary
//!
//! Run with: cargo run -p lontar-rag --bin lontar-rag-server
//!
//! Required environment: GOOGLE_APIKEY, GROQ_APIKEY, ASTRADB_APIKEY,
//! ASTRADB_ENDPOINT. Optional: ASTRADB_COLLECTION, ASTRADB_NAMESPACE.

use lontar_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lontar_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Loading environment variables...");
    let config = RagConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Chat model: {}", config.llm.model);
    tracing::info!(
        "  - Vector collection: {}/{}",
        config.astra.keyspace,
        config.astra.collection
    );

    let server = RagServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/ingest - Load a PDF and a CSV");
    println!("  POST /api/query  - Ask a question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
