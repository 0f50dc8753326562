pub mod providers;

use crate::config::station::{MAX_RESULTS, MIN_RESULTS};

/// Search provider abstraction - different providers can be plugged in
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a web search and return result URLs in rank order,
    /// at most `options.num_results` of them.
    async fn search(&self, query: &str, options: &SearchOptions)
        -> Result<Vec<String>, SearchError>;
}

/// Search options controlling result count and deduplication
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of results to return (clamped to 1-10)
    pub num_results: usize,
    /// Suppress exact-duplicate URLs, preserving first-seen order
    pub unique: bool,
}

impl SearchOptions {
    pub fn new(num_results: usize, unique: bool) -> Self {
        Self {
            num_results: num_results.clamp(MIN_RESULTS, MAX_RESULTS),
            unique,
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_results: 5,
            unique: true,
        }
    }
}

/// Search-related errors
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid API key")]
    InvalidApiKey,
}

/// Filter a URL list down to well-formed web URLs.
///
/// Keeps only entries starting with `http://` or `https://`, preserving
/// relative order; empty entries are dropped.
pub fn validate_urls(urls: &[String]) -> Vec<String> {
    urls.iter()
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_urls_keeps_only_web_urls() {
        let urls = vec![
            "https://a.com".to_string(),
            "ftp://b".to_string(),
            "".to_string(),
            "not a url".to_string(),
        ];
        assert_eq!(validate_urls(&urls), vec!["https://a.com".to_string()]);
    }

    #[test]
    fn test_validate_urls_preserves_order() {
        let urls = vec![
            "https://first.com".to_string(),
            "gopher://skip".to_string(),
            "http://second.com".to_string(),
            "https://third.com".to_string(),
        ];
        assert_eq!(
            validate_urls(&urls),
            vec![
                "https://first.com".to_string(),
                "http://second.com".to_string(),
                "https://third.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_search_options_clamp_bounds() {
        assert_eq!(SearchOptions::new(0, true).num_results, 1);
        assert_eq!(SearchOptions::new(25, false).num_results, 10);
        assert_eq!(SearchOptions::new(5, true).num_results, 5);
    }
}
