pub mod cleanup;
pub mod ollama;
pub mod types;

use crate::config::station::{Provider, Station};
use ollama::OllamaClient;
use std::sync::{Arc, Mutex};
use types::{ChatResponse, Message};

/// LLM-related errors
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider '{0}' is not supported yet")]
    UnsupportedProvider(String),
}

/// Chat model abstraction - different providers can be plugged in
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a conversation to the model and return its reply.
    ///
    /// `tools` are provider-format tool definitions; `None` disables tool use.
    async fn chat(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<serde_json::Value>>,
    ) -> Result<ChatResponse, LlmError>;

    /// List the models installed at the provider.
    ///
    /// Also serves as the startup reachability probe: a provider that cannot
    /// answer this blocks any run.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

struct CachedClient {
    key: (Provider, String),
    client: Arc<dyn ChatModel>,
}

/// Memoizing factory for chat clients.
///
/// The handle is rebuilt only when the (provider, model) pair changes, so
/// switching back and forth between stations does not leak stale clients.
pub struct ClientFactory {
    cached: Mutex<Option<CachedClient>>,
}

impl ClientFactory {
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
        }
    }

    pub fn get(&self, station: &Station) -> Result<Arc<dyn ChatModel>, LlmError> {
        let key = (station.provider, station.model.clone());

        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = cached.as_ref() {
            if entry.key == key {
                return Ok(entry.client.clone());
            }
        }

        tracing::info!(
            provider = ?station.provider,
            model = %station.model,
            "initializing chat client"
        );

        let client: Arc<dyn ChatModel> = match station.provider {
            Provider::Ollama => Arc::new(OllamaClient::new(station.clone())),
            // Future providers can be added here:
            // Provider::OpenAi => Arc::new(OpenAiClient::new(station.clone())),
            Provider::OpenAi => return Err(LlmError::UnsupportedProvider("openai".to_string())),
        };

        *cached = Some(CachedClient {
            key,
            client: client.clone(),
        });

        Ok(client)
    }
}

impl Default for ClientFactory {
    fn default() -> Self {
        Self::new()
    }
}
