//! Chat model provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for chat-completion calls
///
/// Both pipeline uses go through the same single entry point: the query
/// expander (which decodes the reply against a schema) and the answer
/// generator (which returns the raw text).
///
/// Implementations:
/// - `GroqChat`: Groq OpenAI-compatible chat completions (gemma2-9b-it)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the model's raw text reply
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
