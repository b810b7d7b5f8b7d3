//! Port traits implemented by infrastructure crates.
//!
//! The orchestrator in `nodes` depends only on these traits; `llm`, `search`
//! and `logstore` supply the implementations and the CLI wires them together.

use async_trait::async_trait;

use crate::{ClientError, LogEntry, LogStoreError, ModelId, NewLogEntry, RunId};

/// A generative text model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for `prompt`.
    ///
    /// `model` selects a specific model; `None` uses the provider's default.
    /// One provider round-trip per call, no retries.
    ///
    /// # Errors
    ///
    /// [`ClientError::Configuration`] when no credential is configured,
    /// [`ClientError::Provider`] for any provider or transport failure.
    async fn generate(&self, prompt: &str, model: Option<&ModelId>) -> Result<String, ClientError>;
}

/// A web search provider.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Returns the snippets of the top results for `query` (at most five).
    ///
    /// An empty result set is `Ok(vec![])`, never an error.
    ///
    /// # Errors
    ///
    /// [`ClientError::Configuration`] when no credential is configured,
    /// [`ClientError::Provider`] for non-success statuses or transport failures.
    async fn search(&self, query: &str) -> Result<Vec<String>, ClientError>;
}

/// Append-only store of agent log entries.
///
/// Must accept concurrent appends from independent runs.
#[async_trait]
pub trait RunLogStore: Send + Sync {
    /// Appends one entry. The store assigns its id and creation timestamp.
    async fn append(&self, entry: &NewLogEntry) -> Result<(), LogStoreError>;

    /// Returns every entry of `run_id`, ordered by creation time ascending.
    async fn list_run(&self, run_id: RunId) -> Result<Vec<LogEntry>, LogStoreError>;
}
