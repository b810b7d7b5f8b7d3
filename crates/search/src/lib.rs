//! Draftsmith web-search adapter.
//!
//! Implements the [`pipeline::WebSearcher`] port for the Tavily search API.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Only request and response shapes live here; what the
//! snippets are used for is decided by the researcher in `nodes`.

pub mod tavily;

pub use tavily::{TavilyClient, TavilyConfig, DEFAULT_BASE_URL, MAX_RESULTS};
