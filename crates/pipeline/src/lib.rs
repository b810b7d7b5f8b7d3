//! Core domain for Draftsmith.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, business rule, and error type used by the content pipeline.
//! Infrastructure crates implement the port traits defined here; they never
//! add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RunId`, `Topic`, `ModelId`, `Document`, etc.) |
//! | [`types`] | Shared value types (`AgentName`, `LogMetadata`, `RunResult`, etc.) |
//! | [`errors`] | Client, agent, pipeline, and log-store error types |
//! | [`ports`] | `TextGenerator`, `WebSearcher`, `RunLogStore` |
//! | [`research`] | Topic parsing and research formatting |
//! | [`verdict`] | Fact-check verdict parsing and revision feedback |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod research;
pub mod types;
pub mod verdict;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{AgentCause, AgentError, ClientError, LogStoreError, PipelineError};
pub use identifiers::{Document, LogEntryId, ModelId, RunId, Topic};
pub use ports::{RunLogStore, TextGenerator, WebSearcher};
pub use research::{format_research, parse_topics, TopicFindings, MAX_TOPICS};
pub use types::{
    AgentName, ErrorNote, FactCheckResult, LogEntry, LogMetadata, NewLogEntry, RunResult, Stage,
    Timestamp, WarningNote,
};
pub use verdict::{parse_verdict, research_with_feedback, revision_feedback};
