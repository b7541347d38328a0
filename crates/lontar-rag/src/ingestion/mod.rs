//! Document loading and semantic chunking

pub mod chunker;
pub mod loader;

pub use chunker::SemanticChunker;
pub use loader::{load_csv, load_pdf};
