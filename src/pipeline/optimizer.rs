//! Query optimization: rewrite a raw user query into a search-friendly one.

use crate::llm::cleanup::ResponseCleanup;
use crate::llm::types::Message;
use crate::llm::ChatModel;
use crate::pipeline::prompts;

/// Result of a query-optimization attempt. `fell_back` marks that the model
/// reply could not be used and the original query was kept.
#[derive(Debug, Clone)]
pub struct OptimizedQuery {
    pub query: String,
    pub fell_back: bool,
}

/// Ask the model for a search-engine-friendly rewrite of `user_query`.
///
/// Any failure here is recoverable: the original query is returned and the
/// pipeline continues with it.
pub async fn optimize_query(
    model: &dyn ChatModel,
    model_name: &str,
    cleanup: &ResponseCleanup,
    user_query: &str,
) -> OptimizedQuery {
    let prompt = prompts::search_query_gen(user_query);

    let response = match model.chat(vec![Message::user(prompt)], None).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "query optimization call failed, using original query");
            return fallback(user_query);
        }
    };

    let cleaned = cleanup.extract_answer(model_name, &response.content);

    let value: serde_json::Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse optimized query, using original query");
            return fallback(user_query);
        }
    };

    match value.get("query").and_then(|q| q.as_str()) {
        Some(query) if !query.trim().is_empty() => {
            tracing::debug!(original = %user_query, optimized = %query, "query optimized");
            OptimizedQuery {
                query: query.to_string(),
                fell_back: false,
            }
        }
        _ => {
            tracing::warn!("optimized query reply lacks a usable 'query' key, using original query");
            fallback(user_query)
        }
    }
}

fn fallback(user_query: &str) -> OptimizedQuery {
    OptimizedQuery {
        query: user_query.to_string(),
        fell_back: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{ChatResponse, Message};
    use crate::llm::LlmError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedModel {
        reply: String,
        calls: AtomicUsize,
    }

    impl CannedModel {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChatModel for CannedModel {
        async fn chat(
            &self,
            _messages: Vec<Message>,
            _tools: Option<Vec<serde_json::Value>>,
        ) -> Result<ChatResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ChatResponse {
                content: self.reply.clone(),
                tool_calls: Vec::new(),
                usage: None,
            })
        }

        async fn list_models(&self) -> Result<Vec<String>, LlmError> {
            Ok(vec!["test".to_string()])
        }
    }

    #[tokio::test]
    async fn test_parses_plain_json_reply() {
        let model = CannedModel::new(r#"{"query": "agentic RAG architecture"}"#);
        let result = optimize_query(
            &model,
            "llama3.2",
            &ResponseCleanup::default(),
            "What is agentic RAG?",
        )
        .await;
        assert!(!result.fell_back);
        assert_eq!(result.query, "agentic RAG architecture");
    }

    #[tokio::test]
    async fn test_parses_fenced_json_reply() {
        let model = CannedModel::new("```json\n{\"query\": \"rust borrow checker\"}\n```");
        let result = optimize_query(
            &model,
            "llama3.2",
            &ResponseCleanup::default(),
            "how does borrowing work",
        )
        .await;
        assert!(!result.fell_back);
        assert_eq!(result.query, "rust borrow checker");
    }

    #[tokio::test]
    async fn test_thinking_model_reply_is_unwrapped() {
        let model =
            CannedModel::new("<think>let me see</think>{\"query\": \"vector databases\"}");
        let result = optimize_query(
            &model,
            "qwen3:8b",
            &ResponseCleanup::default(),
            "what are vector dbs",
        )
        .await;
        assert!(!result.fell_back);
        assert_eq!(result.query, "vector databases");
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back_to_original() {
        let model = CannedModel::new("sorry, I cannot produce JSON");
        let result = optimize_query(
            &model,
            "llama3.2",
            &ResponseCleanup::default(),
            "original query",
        )
        .await;
        assert!(result.fell_back);
        assert_eq!(result.query, "original query");
    }

    #[tokio::test]
    async fn test_missing_query_key_falls_back() {
        let model = CannedModel::new(r#"{"search": "wrong key"}"#);
        let result = optimize_query(
            &model,
            "llama3.2",
            &ResponseCleanup::default(),
            "original query",
        )
        .await;
        assert!(result.fell_back);
        assert_eq!(result.query, "original query");
    }
}
