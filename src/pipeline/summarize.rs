//! Per-page summarization and the final combine step.

use crate::llm::types::{Message, TokenUsage};
use crate::llm::{ChatModel, LlmError};
use crate::loader::PageDocument;
use crate::pipeline::prompts;
use serde::{Deserialize, Serialize};

/// Placeholder text for a page whose summarization call failed.
pub const SUMMARY_ERROR_PLACEHOLDER: &str = "Error generating summary";

/// Fixed reply when there is nothing to combine.
pub const EMPTY_COMBINE_MESSAGE: &str = "No summaries available to combine.";

/// Placeholder text when the combine call itself fails.
pub const COMBINE_ERROR_PLACEHOLDER: &str = "Error generating final summary";

/// Summary of a single page, with token usage when the model reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub url: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub usage: Option<TokenUsage>,
}

/// The consolidated answer/summary across all pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalSummary {
    pub summary: String,
    pub tokens: u32,
}

/// Summarize one loaded page.
///
/// The user query is plumbed through for prompt construction, but the
/// canonical prompt summarizes the document on its own terms.
pub async fn summarize_page(
    model: &dyn ChatModel,
    _query: &str,
    page: &PageDocument,
) -> Result<PageSummary, LlmError> {
    let prompt = prompts::single_webpage_summary(&page.joined());
    let response = model.chat(vec![Message::user(prompt)], None).await?;

    Ok(PageSummary {
        url: page.url.clone(),
        summary: response.content,
        usage: response.usage,
    })
}

/// Combine per-page summaries into the final answer/summary.
///
/// With no summaries this short-circuits without a model call. A failed
/// model call yields a placeholder result rather than an error; nothing
/// escapes this boundary.
pub async fn combine_summaries(
    model: &dyn ChatModel,
    query: &str,
    summaries: &[PageSummary],
) -> FinalSummary {
    if summaries.is_empty() {
        return FinalSummary {
            summary: EMPTY_COMBINE_MESSAGE.to_string(),
            tokens: 0,
        };
    }

    let summaries_text = summaries
        .iter()
        .enumerate()
        .map(|(i, s)| format!("Summary {}:\n\t{}", i + 1, s.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    let prompt = prompts::final_summary(query, &summaries_text);

    match model.chat(vec![Message::user(prompt)], None).await {
        Ok(response) => FinalSummary {
            summary: response.content,
            tokens: response.usage.map(|u| u.total_tokens).unwrap_or(0),
        },
        Err(e) => {
            tracing::warn!(error = %e, "final summary call failed");
            FinalSummary {
                summary: COMBINE_ERROR_PLACEHOLDER.to_string(),
                tokens: 0,
            }
        }
    }
}
