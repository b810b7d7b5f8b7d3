//! Researcher agent.
//!
//! Extracts a handful of topics from the requirements document, runs one web
//! search per topic, and renders the findings into a single research text.

use std::sync::Arc;

use pipeline::{
    format_research, parse_topics, AgentCause, AgentError, AgentName, Document, ModelId,
    TextGenerator, TopicFindings, WebSearcher,
};

use crate::prompts;

/// Agent that gathers web research for a document.
pub struct Researcher {
    generator: Arc<dyn TextGenerator>,
    searcher: Arc<dyn WebSearcher>,
    model: Option<ModelId>,
}

impl Researcher {
    /// Creates a researcher using `model` (or the generator's default) for
    /// topic extraction.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        searcher: Arc<dyn WebSearcher>,
        model: Option<ModelId>,
    ) -> Self {
        Self {
            generator,
            searcher,
            model,
        }
    }

    /// Produces the formatted research text for `document`.
    ///
    /// Topics are searched one at a time, in extraction order, so the research
    /// text is deterministic.
    ///
    /// # Errors
    ///
    /// Returns a researcher [`AgentError`] if topic extraction or any search
    /// fails, or if no topic could be extracted (no search is made then).
    pub async fn run(&self, document: &Document) -> Result<String, AgentError> {
        let fail = |cause: AgentCause| AgentError::new(AgentName::Researcher, cause);

        let response = self
            .generator
            .generate(&prompts::topic_extraction(document.as_str()), self.model.as_ref())
            .await
            .map_err(|e| fail(e.into()))?;

        let topics = parse_topics(&response);
        if topics.is_empty() {
            return Err(fail(AgentCause::NoTopics));
        }
        tracing::debug!(count = topics.len(), "extracted research topics");

        let mut findings = Vec::with_capacity(topics.len());
        for topic in topics {
            let snippets = self
                .searcher
                .search(topic.as_str())
                .await
                .map_err(|e| fail(e.into()))?;
            tracing::debug!(topic = %topic, snippets = snippets.len(), "searched topic");
            findings.push(TopicFindings { topic, snippets });
        }

        Ok(format_research(&findings))
    }
}

#[cfg(test)]
mod tests {
    use pipeline::ClientError;

    use super::*;
    use crate::test_support::{RecordingSearcher, Role, ScriptedGenerator};

    fn document() -> Document {
        Document::new("Product: X. Goal: explain X.").unwrap()
    }

    #[tokio::test]
    async fn test_searches_each_topic_in_order() {
        let generator = Arc::new(ScriptedGenerator::happy().topics(|_, _| Ok("b, a, c".into())));
        let searcher = Arc::new(RecordingSearcher::default());
        let researcher = Researcher::new(generator.clone(), searcher.clone(), None);

        let research = researcher.run(&document()).await.unwrap();

        assert_eq!(searcher.queries(), vec!["b", "a", "c"]);
        let b = research.find("Topic: b").unwrap();
        let a = research.find("Topic: a").unwrap();
        let c = research.find("Topic: c").unwrap();
        assert!(b < a && a < c);
        assert_eq!(research.matches("[Fact 1]").count(), 3);
        assert_eq!(generator.count(Role::Topics), 1);
    }

    #[tokio::test]
    async fn test_no_topics_fails_without_searching() {
        let generator = Arc::new(ScriptedGenerator::happy().topics(|_, _| Ok(" , ,".into())));
        let searcher = Arc::new(RecordingSearcher::default());
        let researcher = Researcher::new(generator, searcher.clone(), None);

        let err = researcher.run(&document()).await.unwrap_err();

        assert_eq!(err.agent, AgentName::Researcher);
        assert_eq!(err.cause, AgentCause::NoTopics);
        assert!(searcher.queries().is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_is_a_research_error() {
        let generator = Arc::new(ScriptedGenerator::happy());
        let searcher = Arc::new(RecordingSearcher::failing_on("X benefits"));
        let researcher = Researcher::new(generator, searcher.clone(), None);

        let err = researcher.run(&document()).await.unwrap_err();

        assert_eq!(err.agent, AgentName::Researcher);
        assert!(err.to_string().contains("status 502"));
        assert_eq!(searcher.queries(), vec!["X features", "X benefits"]);
    }

    #[tokio::test]
    async fn test_extraction_failure_keeps_cause_message() {
        let generator = Arc::new(
            ScriptedGenerator::happy()
                .topics(|_, _| Err(ClientError::configuration("GOOGLE_API_KEY is not set"))),
        );
        let researcher = Researcher::new(generator, Arc::new(RecordingSearcher::default()), None);

        let err = researcher.run(&document()).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Research agent failed: Configuration error: GOOGLE_API_KEY is not set"
        );
    }

    #[tokio::test]
    async fn test_configured_model_is_used_for_extraction() {
        let generator = Arc::new(ScriptedGenerator::happy());
        let model = ModelId::new("gemini-1.5-pro");
        let researcher =
            Researcher::new(generator.clone(), Arc::new(RecordingSearcher::default()), model.clone());

        researcher.run(&document()).await.unwrap();

        assert_eq!(generator.models(Role::Topics), vec![model]);
    }
}
