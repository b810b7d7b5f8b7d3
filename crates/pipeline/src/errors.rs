//! Error taxonomy for the Draftsmith pipeline domain.
//!
//! Layers, innermost first:
//!
//! - [`ClientError`]: produced by the text-generation and web-search ports.
//! - [`AgentError`]: an agent's failure, tagged with the [`AgentName`] that
//!   failed (the research, writer, fact-check, and polish errors).
//! - [`PipelineError`]: the orchestrator's failure, tagged with the
//!   [`Stage`] that aborted the run.
//!
//! [`LogStoreError`] sits beside these: the orchestrator never propagates it.

use thiserror::Error;

use crate::{AgentName, Stage};

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failure of a text-generation or web-search call.
///
/// Neither variant is retried at the client layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No credential is configured for the provider. Fatal immediately.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the missing or invalid setting.
        message: String,
    },

    /// The provider call failed (network, non-success status, quota,
    /// malformed response).
    #[error("{provider} request failed: {message}")]
    Provider {
        /// Provider label used in messages (e.g. `"Gemini"`, `"Tavily"`).
        provider: String,
        /// Description of the underlying failure.
        message: String,
    },
}

impl ClientError {
    /// Shorthand for a [`ClientError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for a [`ClientError::Provider`].
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Agent errors
// ---------------------------------------------------------------------------

/// Why an agent failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentCause {
    /// A collaborator call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The researcher could not extract a single usable topic.
    #[error("no topics extracted from document")]
    NoTopics,
}

/// An agent invocation failed.
///
/// `agent` identifies which wrap this is: research, writer, fact-check or
/// polish error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} agent failed: {cause}", .agent.label())]
pub struct AgentError {
    /// The agent that failed.
    pub agent: AgentName,
    /// Underlying cause.
    #[source]
    pub cause: AgentCause,
}

impl AgentError {
    /// Wraps `cause` as a failure of `agent`.
    pub fn new(agent: AgentName, cause: impl Into<AgentCause>) -> Self {
        Self {
            agent,
            cause: cause.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// A run was aborted.
///
/// No partial result accompanies this error: a run is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Pipeline failed at {stage} stage: {source}")]
pub struct PipelineError {
    /// Stage that aborted the run.
    pub stage: Stage,
    /// The agent failure that caused the abort.
    #[source]
    pub source: AgentError,
}

impl PipelineError {
    /// Creates a [`PipelineError`] for `stage`.
    pub fn new(stage: Stage, source: AgentError) -> Self {
        Self { stage, source }
    }
}

// ---------------------------------------------------------------------------
// Log store errors
// ---------------------------------------------------------------------------

/// Failure of the run log store.
///
/// The orchestrator logs and swallows these; they surface only to direct
/// callers of [`crate::RunLogStore`] such as the timeline query.
#[derive(Debug, Error)]
pub enum LogStoreError {
    /// The store is not configured (missing URL or key).
    #[error("Log store configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The request could not be sent or no response was received.
    #[error("Log store request failed: {message}")]
    Request {
        /// Description of the transport failure.
        message: String,
    },

    /// The store answered with a non-success status.
    #[error("Log store returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// Stored rows could not be decoded.
    #[error("Log store returned malformed data: {message}")]
    Decode {
        /// Description of the decoding problem.
        message: String,
    },
}
