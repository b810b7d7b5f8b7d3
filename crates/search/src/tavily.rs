//! Tavily search client.

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{ClientError, WebSearcher};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Public Tavily API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
/// Results requested per query.
pub const MAX_RESULTS: u32 = 5;

const PROVIDER: &str = "Tavily";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the Tavily API.
#[derive(Clone)]
pub struct TavilyConfig {
    /// API key. `None` makes every search fail with a configuration error.
    pub api_key: Option<String>,
    /// Base URL without trailing path.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for TavilyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl TavilyConfig {
    /// Reads `TAVILY_API_KEY` and `TAVILY_BASE_URL`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var("TAVILY_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        if let Ok(url) = std::env::var("TAVILY_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        config
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

/// Pulls one snippet per result: `content`, else `snippet`, else `""`.
///
/// Anything other than a `results` array yields no snippets.
fn extract_snippets(body: &Value) -> Vec<String> {
    let Some(results) = body.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };
    results
        .iter()
        .map(|result| {
            ["content", "snippet"]
                .iter()
                .filter_map(|field| result.get(field).and_then(Value::as_str))
                .find(|text| !text.is_empty())
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// [`WebSearcher`] backed by Tavily's `/search` endpoint.
pub struct TavilyClient {
    client: Client,
    config: TavilyConfig,
}

impl TavilyClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: TavilyConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WebSearcher for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<String>, ClientError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ClientError::configuration("TAVILY_API_KEY environment variable is not set"))?;

        debug!(query, "searching Tavily");
        let response = self
            .client
            .post(self.endpoint())
            .json(&SearchRequest {
                api_key,
                query,
                max_results: MAX_RESULTS,
            })
            .send()
            .await
            .map_err(|e| ClientError::provider(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::provider(PROVIDER, format!("status {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::provider(PROVIDER, format!("malformed response: {e}")))?;
        let snippets = extract_snippets(&body);
        debug!(query, results = snippets.len(), "Tavily search completed");
        Ok(snippets)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = SearchRequest {
            api_key: "k",
            query: "X features",
            max_results: MAX_RESULTS,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"api_key": "k", "query": "X features", "max_results": 5})
        );
    }

    #[test]
    fn test_snippets_fall_back_from_content_to_snippet() {
        let body = json!({
            "query": "X features",
            "results": [
                {"title": "a", "url": "https://a", "content": "from content", "snippet": "unused"},
                {"title": "b", "url": "https://b", "content": "", "snippet": "from snippet"},
                {"title": "c", "url": "https://c"}
            ]
        });
        assert_eq!(
            extract_snippets(&body),
            vec!["from content".to_string(), "from snippet".to_string(), String::new()]
        );
    }

    #[test]
    fn test_missing_results_is_empty() {
        assert!(extract_snippets(&json!({"answer": null})).is_empty());
        assert!(extract_snippets(&json!({"results": "nope"})).is_empty());
        assert!(extract_snippets(&json!({"results": []})).is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let client = TavilyClient::new(TavilyConfig::default().with_base_url("http://127.0.0.1:9")).unwrap();
        let err = client.search("X features").await.unwrap_err();
        assert_eq!(
            err,
            ClientError::configuration("TAVILY_API_KEY environment variable is not set")
        );
    }

    #[test]
    fn test_endpoint_trims_base() {
        let client = TavilyClient::new(TavilyConfig::default().with_base_url("http://localhost:8081/")).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8081/search");
    }
}
