//! Draftsmith agents and pipeline executor.
//!
//! This crate provides the four agents (researcher, writer, fact-checker,
//! polisher), their prompt templates, and the [`PipelineExecutor`] that
//! sequences them, owns the fact-check/revise loop, and records every agent
//! invocation in the run log.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Agents sequence calls between business rules in the
//! [`pipeline`] crate and its port traits (text generation, web search, log
//! store). They never touch run state; only the executor does.

pub mod config;
pub mod executor;
pub mod fact_checker;
pub mod logger;
pub mod polisher;
pub mod prompts;
pub mod researcher;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ConfigError, PipelineConfig, PipelineConfigBuilder};
pub use executor::PipelineExecutor;
pub use fact_checker::FactChecker;
pub use logger::RunLogger;
pub use polisher::Polisher;
pub use researcher::Researcher;
pub use writer::Writer;
