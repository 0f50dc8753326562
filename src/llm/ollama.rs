use crate::config::station::Station;
use crate::llm::types::{ChatResponse, Message, TokenUsage, ToolCall};
use crate::llm::{ChatModel, LlmError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://localhost:11434";

/// Ollama API client (non-streaming chat)
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    station: Station,
}

impl OllamaClient {
    pub fn new(station: Station) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_else(|_| Client::new()),
            station,
        }
    }

    fn api_base(&self) -> &str {
        self.station.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

#[async_trait::async_trait]
impl ChatModel for OllamaClient {
    async fn chat(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<serde_json::Value>>,
    ) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/api/chat", self.api_base());

        tracing::debug!(
            api_base = %self.api_base(),
            model = %self.station.model,
            message_count = messages.len(),
            tool_count = tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "ollama chat request"
        );

        let options = if self.station.temperature.is_some() || self.station.max_tokens.is_some() {
            Some(ChatOptions {
                temperature: self.station.temperature,
                num_predict: self.station.max_tokens,
            })
        } else {
            None
        };

        let request_body = ChatRequest {
            model: &self.station.model,
            messages: &messages,
            stream: false,
            tools,
            options,
        };

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_secrets(&error_text),
                "ollama api returned error"
            );

            let error_msg = match status.as_u16() {
                404 => format!(
                    "Model '{}' not found. Pull it first with `ollama pull {}`.\n\nDetails: {}",
                    self.station.model, self.station.model, error_text
                ),
                400 => format!(
                    "Bad Request (400): The request was invalid. Please check your input.\n\nDetails: {}",
                    error_text
                ),
                500..=599 => format!(
                    "Server Error ({}): Ollama is experiencing issues. Please try again later.\n\nDetails: {}",
                    status, error_text
                ),
                _ => format!("API request failed ({}): {}", status, error_text),
            };

            return Err(LlmError::Api(error_msg));
        }

        let body: ChatResponseBody = response.json().await?;

        let usage = match (body.prompt_eval_count, body.eval_count) {
            (None, None) => None,
            (prompt, completion) => {
                let prompt = prompt.unwrap_or(0);
                let completion = completion.unwrap_or(0);
                Some(TokenUsage {
                    prompt_tokens: prompt,
                    completion_tokens: completion,
                    total_tokens: prompt + completion,
                })
            }
        };

        tracing::debug!(
            model = %self.station.model,
            content_len = body.message.content.len(),
            tool_calls = body.message.tool_calls.len(),
            total_tokens = usage.map(|u| u.total_tokens).unwrap_or(0),
            "ollama chat response"
        );

        Ok(ChatResponse {
            content: body.message.content,
            tool_calls: body.message.tool_calls,
            usage,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.api_base());

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!(
                "Failed to list models (HTTP {}): {}",
                status, error_text
            )));
        }

        let body: TagsResponse = response.json().await?;
        Ok(body.models.into_iter().map(|m| m.model).collect())
    }
}

/// Request body for /api/chat
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Response body for /api/chat (stream: false)
#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    message: ResponseMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

/// Response body for /api/tags
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    model: String,
}
