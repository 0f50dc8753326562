use crate::search::{SearchError, SearchOptions, SearchProvider};
use std::collections::HashSet;
use std::time::Duration;

/// Brave Search API provider
///
/// Requires BRAVE_API_KEY environment variable to be set.
/// Free tier: 2000 requests/month
/// Documentation: https://brave.com/search/api/
pub struct BraveSearchProvider {
    client: reqwest::Client,
    api_key: String,
}

impl BraveSearchProvider {
    /// Create a new Brave Search provider
    ///
    /// API key is read from BRAVE_API_KEY environment variable
    pub fn new() -> Self {
        let api_key = std::env::var("BRAVE_API_KEY").unwrap_or_else(|_| {
            tracing::warn!("BRAVE_API_KEY not set, web searches will fail");
            String::new()
        });

        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key,
        }
    }

    /// Reduce raw result URLs to the requested count, optionally suppressing
    /// exact duplicates while keeping first-seen order.
    fn collect_urls(raw: impl IntoIterator<Item = String>, options: &SearchOptions) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut urls = Vec::new();

        for url in raw {
            if url.is_empty() {
                continue;
            }
            if options.unique && !seen.insert(url.clone()) {
                tracing::trace!(url = %url, "duplicate url suppressed");
                continue;
            }
            urls.push(url);
            if urls.len() >= options.num_results {
                break;
            }
        }

        urls
    }
}

impl Default for BraveSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SearchProvider for BraveSearchProvider {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<String>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::InvalidApiKey);
        }

        let url = "https://api.search.brave.com/res/v1/web/search";

        tracing::debug!(
            query = %query,
            num_results = options.num_results,
            unique = options.unique,
            "performing brave search"
        );

        let response = self
            .client
            .get(url)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", &options.num_results.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_secrets(&error_text),
                "brave search api error"
            );

            return match status.as_u16() {
                401 | 403 => Err(SearchError::InvalidApiKey),
                429 => Err(SearchError::RateLimitExceeded),
                _ => Err(SearchError::ApiError(format!(
                    "HTTP {}: {}",
                    status, error_text
                ))),
            };
        }

        let json: serde_json::Value = response.json().await?;

        let raw = json["web"]["results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .map(|r| r["url"].as_str().unwrap_or("").to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let urls = Self::collect_urls(raw, options);

        tracing::debug!(
            query = %query,
            result_count = urls.len(),
            "brave search completed"
        );

        Ok(urls)
    }
}
