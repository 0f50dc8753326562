//! Page loading: fetch a URL, extract its text, segment it.

use std::time::Duration;

/// One loaded page: the URL plus its extracted text segments.
///
/// Immutable once created; segments are joined with a blank line before
/// summarization.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub url: String,
    pub segments: Vec<String>,
}

impl PageDocument {
    /// A page is usable only if at least one segment has non-whitespace text.
    pub fn has_content(&self) -> bool {
        self.segments.iter().any(|s| !s.trim().is_empty())
    }

    /// Full text for prompt construction.
    pub fn joined(&self) -> String {
        self.segments.join("\n\n")
    }
}

/// Page-fetch errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Empty body from {0}")]
    EmptyBody(String),
}

/// Page fetcher abstraction - fetch one URL into text segments
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError>;
}

/// HTTP fetcher: GET the page and convert HTML to plain text.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError> {
        tracing::debug!(url = %url, "fetching page");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(FetchError::EmptyBody(url.to_string()));
        }

        let text = html2text::from_read(html.as_bytes(), 100);
        let segments = split_segments(&text);

        tracing::debug!(
            url = %url,
            html_len = html.len(),
            segments = segments.len(),
            "page fetched"
        );

        Ok(segments)
    }
}

/// Split extracted text into paragraph-ish segments on blank lines.
fn split_segments(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|s| s.to_string())
        .collect()
}
