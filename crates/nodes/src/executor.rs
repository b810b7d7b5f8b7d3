//! The pipeline executor: sequences the four agents for one run.
//!
//! ```text
//! start → researched → drafted → fact-checking(attempt) → polished → done
//!                                   ↑            │
//!                                   └─ revise ───┘   (failed verdict, attempts left)
//! ```
//!
//! A failed *verdict* is self-healing: the writer revises the draft and the
//! check is repeated, up to the configured number of attempts, after which the
//! run proceeds with `fact_check_passed = false`. A fact-checker *execution*
//! error is fatal and never retried. Every agent invocation, successful or
//! not, is appended to the run log on a best-effort basis.

use std::sync::Arc;

use pipeline::{
    research_with_feedback, revision_feedback, AgentName, Document, FactCheckResult, LogMetadata,
    PipelineError, RunId, RunLogStore, RunResult, Stage, TextGenerator, WebSearcher,
};
use serde_json::json;
use tracing::Instrument;

use crate::config::PipelineConfig;
use crate::fact_checker::FactChecker;
use crate::logger::RunLogger;
use crate::polisher::Polisher;
use crate::researcher::Researcher;
use crate::writer::Writer;

/// State of one run, owned exclusively by the executor.
///
/// Exists once a first draft is available; research never changes after that,
/// the draft may be replaced by revisions.
struct RunState<'a> {
    run_id: RunId,
    document: &'a Document,
    research: String,
    draft: String,
    fact_check_passed: bool,
}

impl RunState<'_> {
    fn finish(self, final_post: String) -> RunResult {
        RunResult {
            run_id: self.run_id,
            research: self.research,
            draft: self.draft,
            fact_check_passed: self.fact_check_passed,
            final_post,
        }
    }
}

/// Drives a document through research, writing, fact-checking, and polishing.
///
/// Holds no per-run state, so one executor can serve concurrent runs.
pub struct PipelineExecutor {
    researcher: Researcher,
    writer: Writer,
    fact_checker: FactChecker,
    polisher: Polisher,
    log_store: Arc<dyn RunLogStore>,
    max_fact_check_attempts: u32,
}

impl PipelineExecutor {
    /// Creates an executor over the given collaborators.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        searcher: Arc<dyn WebSearcher>,
        log_store: Arc<dyn RunLogStore>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            researcher: Researcher::new(Arc::clone(&generator), searcher, config.model.clone()),
            writer: Writer::new(Arc::clone(&generator), config.model.clone()),
            fact_checker: FactChecker::new(Arc::clone(&generator), config.fact_check_model.clone()),
            polisher: Polisher::new(generator, config.model.clone()),
            log_store,
            max_fact_check_attempts: config.max_fact_check_attempts.max(1),
        }
    }

    /// Runs the full pipeline for `document` under a freshly minted [`RunId`].
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] naming the stage that aborted the run. No
    /// partial result is returned.
    pub async fn generate(&self, document: &Document) -> Result<RunResult, PipelineError> {
        let run_id = RunId::new_random();
        let span = tracing::info_span!("run", run_id = %run_id);
        self.execute(run_id, document).instrument(span).await
    }

    async fn execute(&self, run_id: RunId, document: &Document) -> Result<RunResult, PipelineError> {
        let log = RunLogger::new(Arc::clone(&self.log_store), run_id);
        tracing::info!("starting content pipeline");

        let research = self.research(&log, document).await?;
        let draft = self.write(&log, document, &research).await?;

        let mut run = RunState {
            run_id,
            document,
            research,
            draft,
            fact_check_passed: false,
        };
        self.fact_check(&log, &mut run).await?;

        let final_post = self.polish(&log, &run.draft).await?;
        tracing::info!(
            fact_check_passed = run.fact_check_passed,
            "pipeline completed"
        );
        Ok(run.finish(final_post))
    }

    async fn research(&self, log: &RunLogger, document: &Document) -> Result<String, PipelineError> {
        tracing::info!("running researcher");
        match self.researcher.run(document).await {
            Ok(research) => {
                log.record(
                    AgentName::Researcher,
                    document.as_str(),
                    research.as_str(),
                    LogMetadata::None,
                )
                .await;
                tracing::info!("research completed");
                Ok(research)
            }
            Err(e) => {
                tracing::error!(error = %e, "researcher failed");
                log.record(
                    AgentName::Researcher,
                    document.as_str(),
                    "",
                    LogMetadata::error(e.to_string()),
                )
                .await;
                Err(PipelineError::new(Stage::Research, e))
            }
        }
    }

    async fn write(
        &self,
        log: &RunLogger,
        document: &Document,
        research: &str,
    ) -> Result<String, PipelineError> {
        tracing::info!("running writer");
        let input = json!({ "prd": document.as_str(), "research": research }).to_string();
        match self.writer.run(document, research).await {
            Ok(draft) => {
                log.record(AgentName::Writer, input, draft.as_str(), LogMetadata::None)
                    .await;
                tracing::info!("initial draft completed");
                Ok(draft)
            }
            Err(e) => {
                tracing::error!(error = %e, "writer failed");
                log.record(AgentName::Writer, input, "", LogMetadata::error(e.to_string()))
                    .await;
                Err(PipelineError::new(Stage::Writing, e))
            }
        }
    }

    /// The bounded fact-check/revise loop.
    async fn fact_check(&self, log: &RunLogger, run: &mut RunState<'_>) -> Result<(), PipelineError> {
        let max = self.max_fact_check_attempts;
        let mut attempt = 0;

        while attempt < max && !run.fact_check_passed {
            tracing::info!(attempt = attempt + 1, max, "running fact-checker");

            let verdict = match self.fact_checker.run(&run.draft, &run.research).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    tracing::error!(error = %e, "fact-checker failed");
                    log.record(
                        AgentName::FactChecker,
                        run.draft.as_str(),
                        "",
                        LogMetadata::error_at_attempt(e.to_string(), attempt + 1),
                    )
                    .await;
                    return Err(PipelineError::new(Stage::FactChecking, e));
                }
            };

            log.record(
                AgentName::FactChecker,
                run.draft.as_str(),
                verdict_json(&verdict),
                LogMetadata::fact_check(attempt + 1, &verdict),
            )
            .await;

            if verdict.passed {
                tracing::info!("fact-check passed");
                run.fact_check_passed = true;
                continue;
            }

            tracing::warn!(issues = ?verdict.issues, "fact-check found unsupported claims");
            attempt += 1;

            if attempt < max {
                self.revise(log, run, &verdict.issues, attempt + 1).await?;
            } else {
                tracing::warn!("fact-check attempts exhausted, proceeding with current draft");
                run.fact_check_passed = false;
                log.record(
                    AgentName::FactChecker,
                    run.draft.as_str(),
                    "Max retries reached",
                    LogMetadata::retries_exhausted(verdict.issues),
                )
                .await;
            }
        }

        Ok(())
    }

    /// Rewrites the draft with fact-check feedback ahead of check `attempt`.
    async fn revise(
        &self,
        log: &RunLogger,
        run: &mut RunState<'_>,
        issues: &[String],
        attempt: u32,
    ) -> Result<(), PipelineError> {
        tracing::info!(attempt, "revising draft");
        let feedback = revision_feedback(issues);
        let input = json!({
            "prd": run.document.as_str(),
            "research": run.research,
            "revisionFeedback": feedback,
        })
        .to_string();

        match self
            .writer
            .run(run.document, &research_with_feedback(&run.research, &feedback))
            .await
        {
            Ok(draft) => {
                log.record(
                    AgentName::Writer,
                    input,
                    draft.as_str(),
                    LogMetadata::revision(attempt),
                )
                .await;
                run.draft = draft;
                tracing::info!(attempt, "draft revised");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "revision failed");
                log.record(
                    AgentName::Writer,
                    input,
                    "",
                    LogMetadata::error_at_attempt(e.to_string(), attempt),
                )
                .await;
                Err(PipelineError::new(Stage::Writing, e))
            }
        }
    }

    async fn polish(&self, log: &RunLogger, draft: &str) -> Result<String, PipelineError> {
        tracing::info!("running polisher");
        match self.polisher.run(draft).await {
            Ok(final_post) => {
                log.record(AgentName::Polisher, draft, final_post.as_str(), LogMetadata::None)
                    .await;
                tracing::info!("content polished");
                Ok(final_post)
            }
            Err(e) => {
                tracing::error!(error = %e, "polisher failed");
                log.record(AgentName::Polisher, draft, "", LogMetadata::error(e.to_string()))
                    .await;
                Err(PipelineError::new(Stage::Polishing, e))
            }
        }
    }
}

fn verdict_json(verdict: &FactCheckResult) -> String {
    json!({ "passed": verdict.passed, "issues": verdict.issues }).to_string()
}
