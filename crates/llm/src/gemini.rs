//! Google Gemini provider.

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{ClientError, ModelId, TextGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Model used when a call does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

const PROVIDER: &str = "Gemini";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key. `None` makes every call fail with a configuration error.
    pub api_key: Option<String>,
    /// Base URL without trailing path.
    pub base_url: String,
    /// Model used when the caller passes none.
    pub default_model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    /// Reads `GOOGLE_API_KEY` and `GEMINI_BASE_URL`, falling back to defaults.
    ///
    /// A missing key is not an error here; it is reported on the first call.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
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

    /// Sets the default model.
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Concatenates the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, String> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed response: {e}"))?;
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        return Err("malformed response: no candidate text".to_string());
    }
    Ok(texts.concat())
}

/// Prefers the API's own error message over the raw body.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!("status {status}: {}", envelope.error.message),
        Err(_) if body.trim().is_empty() => format!("status {status}"),
        Err(_) => format!("status {status}: {}", body.trim()),
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// [`TextGenerator`] backed by the Gemini `generateContent` endpoint.
///
/// One request per call; no retries.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Creates a provider.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, prompt: &str, model: Option<&ModelId>) -> Result<String, ClientError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ClientError::configuration("GOOGLE_API_KEY environment variable is not set"))?;
        let model = model.map_or(self.config.default_model.as_str(), ModelId::as_str);

        debug!(model, prompt_len = prompt.len(), "calling Gemini");
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest::new(prompt))
            .send()
            .await
            .map_err(|e| ClientError::provider(PROVIDER, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::provider(PROVIDER, e.to_string()))?;
        if !status.is_success() {
            return Err(ClientError::provider(PROVIDER, error_message(status, &body)));
        }

        let text = extract_text(&body).map_err(|m| ClientError::provider(PROVIDER, m))?;
        debug!(model, output_len = text.len(), "Gemini call completed");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_body_shape() {
        assert_eq!(
            serde_json::to_value(GenerateRequest::new("hello")).unwrap(),
            json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hello, "}, {"text": "world"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        })
        .to_string();
        assert_eq!(extract_text(&body).unwrap(), "Hello, world");
    }

    #[test]
    fn test_extract_text_without_candidates_is_malformed() {
        let err = extract_text(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert!(err.contains("no candidate text"));
        assert!(extract_text("not json").unwrap_err().starts_with("malformed response"));
    }

    #[test]
    fn test_error_message_prefers_api_message() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            error_message(reqwest::StatusCode::TOO_MANY_REQUESTS, body),
            "status 429 Too Many Requests: Resource has been exhausted"
        );
        assert_eq!(
            error_message(reqwest::StatusCode::BAD_GATEWAY, ""),
            "status 502 Bad Gateway"
        );
    }

    #[test]
    fn test_endpoint_uses_model_and_trims_base() {
        let provider =
            GeminiProvider::new(GeminiConfig::default().with_base_url("http://localhost:8080/")).unwrap();
        assert_eq!(
            provider.endpoint("gemini-2.0-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        // Unroutable base URL: reaching the network would produce a provider error instead.
        let provider =
            GeminiProvider::new(GeminiConfig::default().with_base_url("http://127.0.0.1:9")).unwrap();
        let err = provider.generate("prompt", None).await.unwrap_err();
        assert_eq!(
            err,
            ClientError::configuration("GOOGLE_API_KEY environment variable is not set")
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", GeminiConfig::default().with_api_key("secret-key"));
        assert!(!rendered.contains("secret-key"));
    }
}
