//! Shared value types for the Draftsmith pipeline domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the values that flow between agents, the orchestrator, and the log store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LogEntryId, RunId};

// ---------------------------------------------------------------------------
// Agents and stages
// ---------------------------------------------------------------------------

/// The closed set of agents whose invocations are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentName {
    /// Extracts topics from the document and gathers web research.
    Researcher,
    /// Drafts (and revises) the blog post.
    Writer,
    /// Checks the draft against the research.
    FactChecker,
    /// Polishes the final draft for tone and grammar.
    Polisher,
}

impl AgentName {
    /// The wire name stored in the `agent` column (e.g. `"fact-checker"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Researcher => "researcher",
            Self::Writer => "writer",
            Self::FactChecker => "fact-checker",
            Self::Polisher => "polisher",
        }
    }

    /// Human-readable label used in error messages (e.g. `"Fact-checker"`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Researcher => "Research",
            Self::Writer => "Writer",
            Self::FactChecker => "Fact-checker",
            Self::Polisher => "Polisher",
        }
    }
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "researcher" => Ok(Self::Researcher),
            "writer" => Ok(Self::Writer),
            "fact-checker" => Ok(Self::FactChecker),
            "polisher" => Ok(Self::Polisher),
            other => Err(format!("unknown agent '{other}'")),
        }
    }
}

/// Orchestrator stage that aborted a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Topic extraction and web research.
    Research,
    /// Initial draft or a revision.
    Writing,
    /// The fact-check/revise loop.
    FactChecking,
    /// Final polish.
    Polishing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Research => "research",
            Self::Writing => "writing",
            Self::FactChecking => "fact-checking",
            Self::Polishing => "polishing",
        })
    }
}

// ---------------------------------------------------------------------------
// Fact-check verdict
// ---------------------------------------------------------------------------

/// Outcome of one fact-check attempt.
///
/// Transient: folded into the attempt's log metadata and the run's
/// `fact_check_passed` flag, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FactCheckResult {
    /// `true` when the checker found no unsupported claims.
    pub passed: bool,
    /// Unsupported claims, in the order the checker listed them.
    pub issues: Vec<String>,
}

impl FactCheckResult {
    /// A passing verdict with no issues.
    pub fn pass() -> Self {
        Self {
            passed: true,
            issues: Vec::new(),
        }
    }

    /// A failing verdict listing `issues`.
    pub fn fail(issues: Vec<String>) -> Self {
        Self {
            passed: false,
            issues,
        }
    }
}

// ---------------------------------------------------------------------------
// Log metadata
// ---------------------------------------------------------------------------

/// Error details attached to a failed agent invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNote {
    /// Message of the underlying failure.
    pub message: String,
    /// Fact-check attempt (1-based) during which the failure happened, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
}

/// Details attached when the fact-check loop gives up and proceeds anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningNote {
    /// Human-readable warning.
    pub message: String,
    /// Issues reported by the final fact-check attempt.
    pub final_issues: Vec<String>,
}

/// Metadata attached to an agent log entry.
///
/// A closed union over the shapes the orchestrator produces. Serialised
/// untagged so the stored JSON reads naturally to the timeline viewer, e.g.
/// `{"attempt":1,"passed":false,"issues":[...]}` or `{"isRevision":true,"attempt":2}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum LogMetadata {
    /// The invocation failed.
    Error {
        /// Failure details.
        error: ErrorNote,
    },
    /// Fact-checking exhausted its attempts; the run continued.
    Warning {
        /// Warning details.
        warning: WarningNote,
    },
    /// A revision of the draft driven by fact-check feedback.
    Revision {
        /// Always `true`; present so consumers can filter on it.
        is_revision: bool,
        /// Fact-check attempt the revision prepares for (1-based).
        attempt: u32,
    },
    /// One fact-check attempt and its verdict.
    FactCheck {
        /// Attempt number (1-based).
        attempt: u32,
        /// Whether the draft passed.
        passed: bool,
        /// Unsupported claims reported by this attempt.
        issues: Vec<String>,
    },
    /// Plain successful invocation.
    #[default]
    None,
}

impl LogMetadata {
    /// Error metadata for a failure outside the fact-check loop.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: ErrorNote {
                message: message.into(),
                attempt: None,
            },
        }
    }

    /// Error metadata for a failure inside fact-check attempt `attempt`.
    pub fn error_at_attempt(message: impl Into<String>, attempt: u32) -> Self {
        Self::Error {
            error: ErrorNote {
                message: message.into(),
                attempt: Some(attempt),
            },
        }
    }

    /// Warning metadata recording the issues left unresolved.
    pub fn retries_exhausted(final_issues: Vec<String>) -> Self {
        Self::Warning {
            warning: WarningNote {
                message: "Proceeding despite fact-check failures".to_string(),
                final_issues,
            },
        }
    }

    /// Metadata for a revision preparing fact-check attempt `attempt`.
    pub fn revision(attempt: u32) -> Self {
        Self::Revision {
            is_revision: true,
            attempt,
        }
    }

    /// Metadata for fact-check attempt `attempt`.
    pub fn fact_check(attempt: u32, result: &FactCheckResult) -> Self {
        Self::FactCheck {
            attempt,
            passed: result.passed,
            issues: result.issues.clone(),
        }
    }

    /// Returns `true` for error metadata.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns `true` for warning metadata.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning { .. })
    }
}

// ---------------------------------------------------------------------------
// Log entries
// ---------------------------------------------------------------------------

/// An agent log entry as handed to the log store for appending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLogEntry {
    /// Run the invocation belongs to.
    pub run_id: RunId,
    /// Agent that was invoked.
    pub agent: AgentName,
    /// Input text given to the agent.
    pub input: String,
    /// Output text (empty on failure).
    pub output: String,
    /// Attempt, error, warning, or revision details.
    pub metadata: LogMetadata,
}

/// A persisted agent log entry, as read back from the log store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Store-assigned identifier.
    pub id: LogEntryId,
    /// Run the invocation belongs to.
    pub run_id: RunId,
    /// Agent that was invoked.
    pub agent: AgentName,
    /// Input text given to the agent.
    pub input: String,
    /// Output text (empty on failure).
    pub output: String,
    /// Attempt, error, warning, or revision details.
    pub metadata: LogMetadata,
    /// Creation time assigned by the store.
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Run result
// ---------------------------------------------------------------------------

/// Fully populated outcome of a successful run, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Identifier minted at the start of the run.
    pub run_id: RunId,
    /// Formatted research gathered by the researcher.
    pub research: String,
    /// The last draft (possibly revised) before polishing.
    pub draft: String,
    /// Outcome of the last fact-check attempt.
    pub fact_check_passed: bool,
    /// The polished blog post.
    pub final_post: String,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
