//! Polisher agent.

use std::sync::Arc;

use pipeline::{AgentError, AgentName, ModelId, TextGenerator};

use crate::prompts;

/// Agent that polishes tone and grammar without changing facts.
pub struct Polisher {
    generator: Arc<dyn TextGenerator>,
    model: Option<ModelId>,
}

impl Polisher {
    /// Creates a polisher using `model`, or the generator's default.
    pub fn new(generator: Arc<dyn TextGenerator>, model: Option<ModelId>) -> Self {
        Self { generator, model }
    }

    /// Returns the polished post, unmodified.
    ///
    /// # Errors
    ///
    /// Returns a polisher [`AgentError`] if generation fails.
    pub async fn run(&self, draft: &str) -> Result<String, AgentError> {
        self.generator
            .generate(&prompts::polish(draft), self.model.as_ref())
            .await
            .map_err(|e| AgentError::new(AgentName::Polisher, e))
    }
}
