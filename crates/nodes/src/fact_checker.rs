//! Fact-checker agent.

use std::sync::Arc;

use pipeline::{parse_verdict, AgentError, AgentName, FactCheckResult, ModelId, TextGenerator};

use crate::prompts;

/// Agent that checks a draft against the research.
///
/// Always pinned to its own model, independent of the writer's.
pub struct FactChecker {
    generator: Arc<dyn TextGenerator>,
    model: ModelId,
}

impl FactChecker {
    /// Creates a fact-checker pinned to `model`.
    pub fn new(generator: Arc<dyn TextGenerator>, model: ModelId) -> Self {
        Self { generator, model }
    }

    /// Returns the verdict for `draft`.
    ///
    /// A failing verdict is `Ok`; only an execution failure is `Err`.
    ///
    /// # Errors
    ///
    /// Returns a fact-checker [`AgentError`] if generation fails.
    pub async fn run(&self, draft: &str, research: &str) -> Result<FactCheckResult, AgentError> {
        let response = self
            .generator
            .generate(&prompts::fact_check(draft, research), Some(&self.model))
            .await
            .map_err(|e| AgentError::new(AgentName::FactChecker, e))?;
        Ok(parse_verdict(&response))
    }
}

#[cfg(test)]
mod tests {
    use pipeline::ClientError;

    use super::*;
    use crate::test_support::{Role, ScriptedGenerator};

    fn model() -> ModelId {
        ModelId::new("gemini-2.0-flash").unwrap()
    }

    #[tokio::test]
    async fn test_uses_pinned_model_and_parses_issues() {
        let generator = Arc::new(
            ScriptedGenerator::happy()
                .fact_check(|_, _| Ok("- Claim A is unsupported\n- Claim B needs a source".into())),
        );
        let checker = FactChecker::new(generator.clone(), model());

        let verdict = checker.run("DRAFT", "RESEARCH").await.unwrap();

        assert!(!verdict.passed);
        assert_eq!(verdict.issues, vec!["Claim A is unsupported", "Claim B needs a source"]);
        assert_eq!(generator.models(Role::FactCheck), vec![Some(model())]);
    }

    #[tokio::test]
    async fn test_execution_failure_is_an_error_not_a_verdict() {
        let generator = Arc::new(
            ScriptedGenerator::happy()
                .fact_check(|_, _| Err(ClientError::provider("Gemini", "connection reset"))),
        );
        let err = FactChecker::new(generator, model())
            .run("DRAFT", "RESEARCH")
            .await
            .unwrap_err();
        assert_eq!(err.agent, AgentName::FactChecker);
    }
}
