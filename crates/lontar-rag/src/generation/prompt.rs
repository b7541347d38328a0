//! Prompt templates for answer generation

use crate::providers::ScoredChunk;

/// Prompt builder for the answer-generation call
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from retrieved chunks.
    ///
    /// Chunks are numbered in retrieval order; duplicates retrieved under
    /// several query phrasings keep their repeated entries.
    pub fn build_context(results: &[ScoredChunk]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n\nContent:\n{}\n\n---\n\n",
                i + 1,
                result.chunk.source.format_citation(),
                result.chunk.content
            ));
        }

        context
    }

    /// Build the full answer prompt
    pub fn build_answer_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are an expert question-answering assistant with access to specific documents. Your goal is to provide accurate, comprehensive answers based on the retrieved context.

Retrieved context information is below.
---------------------
{context}
---------------------

Given the above context, please answer the following question in a detailed and structured way. If the answer cannot be found in the context, acknowledge this and provide the most helpful response possible without making up information.
Understand the question and translate the question into Indonesian to match the context, then answer it straight away.
Question: {question}

Your answer should:
1. Be directly relevant to the question
2. Include specific facts from the context where applicable
3. Cite sources when quoting information (mention PDF page numbers or CSV rows when available only)
4. Be well-structured and easy to understand
5. Give the answer in the same language as the question

Answer:"#,
            context = context,
            question = question,
        )
    }
}
