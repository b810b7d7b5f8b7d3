//! Writer agent.

use std::sync::Arc;

use pipeline::{AgentError, AgentName, Document, ModelId, TextGenerator};

use crate::prompts;

/// Agent that drafts the blog post from the document and research.
///
/// Revisions reuse the same call with feedback spliced onto the research
/// (see [`pipeline::research_with_feedback`]).
pub struct Writer {
    generator: Arc<dyn TextGenerator>,
    model: Option<ModelId>,
}

impl Writer {
    /// Creates a writer using `model`, or the generator's default.
    pub fn new(generator: Arc<dyn TextGenerator>, model: Option<ModelId>) -> Self {
        Self { generator, model }
    }

    /// Returns the generated draft, unmodified.
    ///
    /// # Errors
    ///
    /// Returns a writer [`AgentError`] if generation fails.
    pub async fn run(&self, document: &Document, research: &str) -> Result<String, AgentError> {
        self.generator
            .generate(&prompts::writer(document.as_str(), research), self.model.as_ref())
            .await
            .map_err(|e| AgentError::new(AgentName::Writer, e))
    }
}
