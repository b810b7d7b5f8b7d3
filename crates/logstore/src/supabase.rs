//! Supabase (PostgREST) log store.
//!
//! Entries are rows of the `agent_logs` table:
//!
//! | Column | Type | Notes |
//! |--------|------|-------|
//! | `id` | uuid or bigint | server default |
//! | `run_id` | uuid | |
//! | `agent` | text | `researcher`, `writer`, `fact-checker`, `polisher` |
//! | `input` | text | |
//! | `output` | text | |
//! | `metadata` | jsonb, nullable | see [`pipeline::LogMetadata`] |
//! | `created_at` | timestamptz | server default `now()` |

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pipeline::{
    AgentName, LogEntry, LogEntryId, LogMetadata, LogStoreError, NewLogEntry, RunId, RunLogStore,
    Timestamp,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

/// Default table name.
pub const DEFAULT_TABLE: &str = "agent_logs";
/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// API key sent as both `apikey` and bearer token.
    pub key: String,
    /// Table holding the log entries.
    pub table: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SupabaseConfig {
    /// Creates a configuration for `url` and `key` with default table and timeout.
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            table: DEFAULT_TABLE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_KEY`.
    ///
    /// Returns `None` unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("SUPABASE_URL").ok().filter(|v| !v.is_empty())?;
        let key = std::env::var("SUPABASE_KEY").ok().filter(|v| !v.is_empty())?;
        Some(Self::new(url, key))
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Row shape sent on insert. `id` and `created_at` are left to the server.
#[derive(Serialize)]
struct InsertRow<'a> {
    run_id: RunId,
    agent: AgentName,
    input: &'a str,
    output: &'a str,
    metadata: &'a LogMetadata,
}

/// Row shape read back from PostgREST.
#[derive(Deserialize)]
struct StoredRow {
    id: serde_json::Value,
    run_id: RunId,
    agent: String,
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl StoredRow {
    fn into_entry(self) -> Result<LogEntry, LogStoreError> {
        let id = match self.id {
            serde_json::Value::String(s) => LogEntryId::new(s),
            other => LogEntryId::new(other.to_string()),
        }
        .ok_or_else(|| LogStoreError::Decode {
            message: "row has an empty id".to_string(),
        })?;
        let agent = self
            .agent
            .parse::<AgentName>()
            .map_err(|message| LogStoreError::Decode { message })?;
        // Rows written by other tools may carry shapes outside the closed set.
        let metadata = serde_json::from_value(self.metadata).unwrap_or_default();

        Ok(LogEntry {
            id,
            run_id: self.run_id,
            agent,
            input: self.input.unwrap_or_default(),
            output: self.output.unwrap_or_default(),
            metadata,
            created_at: Timestamp::from_utc(self.created_at),
        })
    }
}

/// [`RunLogStore`] backed by a Supabase table through its REST interface.
pub struct SupabaseLogStore {
    client: Client,
    endpoint: String,
    key: String,
}

impl SupabaseLogStore {
    /// Creates a store for the configured project.
    ///
    /// # Errors
    ///
    /// Returns [`LogStoreError::Configuration`] if the URL or key is empty or
    /// the HTTP client cannot be built.
    pub fn new(config: SupabaseConfig) -> Result<Self, LogStoreError> {
        if config.url.trim().is_empty() || config.key.trim().is_empty() {
            return Err(LogStoreError::Configuration {
                message: "SUPABASE_URL and SUPABASE_KEY must both be set".to_string(),
            });
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LogStoreError::Configuration {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
            key: config.key,
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    fn run_query_url(&self, run_id: RunId) -> String {
        format!(
            "{}?select=*&run_id=eq.{run_id}&order=created_at.asc",
            self.endpoint
        )
    }
}

async fn ensure_success(response: Response) -> Result<Response, LogStoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LogStoreError::Status {
        status: status.as_u16(),
        body,
    })
}

fn request_error(e: reqwest::Error) -> LogStoreError {
    LogStoreError::Request {
        message: e.to_string(),
    }
}

#[async_trait]
impl RunLogStore for SupabaseLogStore {
    async fn append(&self, entry: &NewLogEntry) -> Result<(), LogStoreError> {
        let row = InsertRow {
            run_id: entry.run_id,
            agent: entry.agent,
            input: &entry.input,
            output: &entry.output,
            metadata: &entry.metadata,
        };
        let response = self
            .request(Method::POST, &self.endpoint)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(request_error)?;
        ensure_success(response).await?;
        tracing::debug!(run_id = %entry.run_id, agent = %entry.agent, "appended agent log entry");
        Ok(())
    }

    async fn list_run(&self, run_id: RunId) -> Result<Vec<LogEntry>, LogStoreError> {
        let response = self
            .request(Method::GET, &self.run_query_url(run_id))
            .send()
            .await
            .map_err(request_error)?;
        let rows: Vec<StoredRow> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| LogStoreError::Decode {
                message: e.to_string(),
            })?;
        rows.into_iter().map(StoredRow::into_entry).collect()
    }
}
