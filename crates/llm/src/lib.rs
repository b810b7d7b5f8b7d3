//! Draftsmith text-generation adapter.
//!
//! Implements the [`pipeline::TextGenerator`] port for Google's Gemini
//! `generateContent` API. Other providers are added as new modules in this
//! crate without any changes to the `pipeline` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting and response
//! parsing live here. The [`pipeline`] crate sees only
//! [`pipeline::TextGenerator`].

pub mod gemini;

pub use gemini::{GeminiConfig, GeminiProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
