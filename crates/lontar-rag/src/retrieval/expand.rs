//! Query expansion: translation plus paraphrase variants
//!
//! One chat call turns a user question into a translated original and a
//! handful of rewordings. The model reply is decoded against a strict
//! schema; a reply that does not contain a list of strings fails the query
//! instead of degrading into a single-query search.

use serde::Deserialize;
use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::providers::LlmProvider;

/// Schema the expansion reply must satisfy
#[derive(Debug, Deserialize)]
struct ExpandedQueries {
    answers: Vec<String>,
}

/// Expands one question into translated and paraphrased variants
pub struct QueryExpander {
    llm: Arc<dyn LlmProvider>,
    variants: usize,
    target_language: String,
}

impl QueryExpander {
    /// Create a new expander
    pub fn new(llm: Arc<dyn LlmProvider>, config: &RetrievalConfig) -> Self {
        Self {
            llm,
            variants: config.expansion_variants,
            target_language: config.target_language.clone(),
        }
    }

    /// Expand a question into up to `variants + 1` search queries
    pub async fn expand(&self, question: &str) -> Result<Vec<String>> {
        let prompt = self.build_prompt(question);
        let reply = self.llm.complete(&prompt).await?;
        let queries = decode_answers(&reply)?;

        tracing::info!("Expanded question into {} variants", queries.len());
        Ok(queries)
    }

    fn build_prompt(&self, question: &str) -> String {
        format!(
            r#"Translate the question into {language}, then generate {variants} different versions of the given question that would help in retrieving relevant information in {language}.
The variations should include different terms and phrasings.

original question: {question}

Respond with a JSON object only, no other text, in exactly this format:
{{"answers": ["translated question", "variant 1", "variant 2", "variant 3"]}}"#,
            language = self.target_language,
            variants = self.variants,
            question = question,
        )
    }
}

/// Decode the model reply into a list of query strings.
///
/// Accepts the JSON object bare or wrapped in a fenced code block. Anything
/// that does not decode to a non-empty list of non-blank strings is an
/// `Error::Expansion`.
fn decode_answers(reply: &str) -> Result<Vec<String>> {
    let json_text = extract_json_object(reply)
        .ok_or_else(|| Error::expansion("Reply contains no JSON object"))?;

    let expanded: ExpandedQueries = serde_json::from_str(json_text)
        .map_err(|e| Error::expansion(format!("Reply does not match schema: {}", e)))?;

    let answers: Vec<String> = expanded
        .answers
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    if answers.is_empty() {
        return Err(Error::expansion("Reply contains an empty answer list"));
    }

    Ok(answers)
}

/// Slice out the outermost JSON object, tolerating code fences and prose
fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}
