use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default station to use
    #[serde(default = "default_station_id")]
    pub default_station: String,

    /// Available LLM stations
    #[serde(default)]
    pub stations: Vec<Station>,

    /// Default pipeline settings (the sidebar equivalents)
    #[serde(default)]
    pub settings: Settings,

    /// Write debug logs to a file
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_station: "local".to_string(),
            stations: vec![Station {
                id: "local".to_string(),
                name: "Local Ollama".to_string(),
                provider: Provider::Ollama,
                api_base: Some("http://localhost:11434".to_string()),
                model: "llama3.2".to_string(),
                max_tokens: None,
                temperature: None,
            }],
            settings: Settings::default(),
            debug: false,
        }
    }
}

impl Config {
    /// Look up a station by id
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// The station selected as default
    pub fn default_station_config(&self) -> Option<&Station> {
        self.station(&self.default_station)
    }
}

/// A "station" represents one LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Unique identifier for this station
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Provider type
    pub provider: Provider,

    /// Optional custom API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Model identifier
    pub model: String,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature (0.0 - 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Supported LLM providers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Ollama,
    OpenAi,
}

impl Provider {
    #[allow(dead_code)]
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Ollama => "http://localhost:11434",
            Provider::OpenAi => "https://api.openai.com",
        }
    }
}

/// Result-count bounds for a search run
pub const MIN_RESULTS: usize = 1;
pub const MAX_RESULTS: usize = 10;

/// Per-run pipeline settings, persisted with the config and adjustable
/// interactively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Number of search results to retrieve (1-10)
    #[serde(default = "default_num_results")]
    pub num_results: usize,

    /// Rewrite the query for search with the model before searching
    #[serde(default = "default_true")]
    pub optimize_query: bool,

    /// Suppress duplicate URLs in search results
    #[serde(default = "default_true")]
    pub unique_results: bool,

    /// Display toggles
    #[serde(default = "default_true")]
    pub show_urls: bool,
    #[serde(default = "default_true")]
    pub show_optimized_query: bool,
    #[serde(default = "default_true")]
    pub show_individual_summaries: bool,
    #[serde(default)]
    pub show_token_info: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_results: default_num_results(),
            optimize_query: true,
            unique_results: true,
            show_urls: true,
            show_optimized_query: true,
            show_individual_summaries: true,
            show_token_info: false,
        }
    }
}

fn default_station_id() -> String {
    "local".to_string()
}

fn default_num_results() -> usize {
    5
}

fn default_true() -> bool {
    true
}
