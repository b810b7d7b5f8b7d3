//! Best-effort run logger.

use std::sync::Arc;

use pipeline::{AgentName, LogMetadata, NewLogEntry, RunId, RunLogStore};

/// Appends agent log entries for one run.
///
/// Store failures are reported through `tracing` and otherwise ignored: they
/// never abort or alter the run.
pub struct RunLogger {
    store: Arc<dyn RunLogStore>,
    run_id: RunId,
}

impl RunLogger {
    /// Creates a logger for `run_id`.
    pub fn new(store: Arc<dyn RunLogStore>, run_id: RunId) -> Self {
        Self { store, run_id }
    }

    /// Appends one entry for an invocation of `agent`.
    pub async fn record(
        &self,
        agent: AgentName,
        input: impl Into<String>,
        output: impl Into<String>,
        metadata: LogMetadata,
    ) {
        let entry = NewLogEntry {
            run_id: self.run_id,
            agent,
            input: input.into(),
            output: output.into(),
            metadata,
        };
        if let Err(e) = self.store.append(&entry).await {
            tracing::warn!(
                run_id = %self.run_id,
                agent = %agent,
                error = %e,
                "failed to append agent log entry"
            );
        }
    }
}
