//! Construction of the concrete collaborators.

use std::sync::Arc;
use std::time::Duration;

use llm::{GeminiConfig, GeminiProvider};
use logstore::{MemoryLogStore, SupabaseConfig, SupabaseLogStore};
use nodes::{PipelineConfig, PipelineExecutor};
use pipeline::RunLogStore;
use search::{TavilyClient, TavilyConfig};
use tracing::{info, warn};

/// Supabase when `SUPABASE_URL` and `SUPABASE_KEY` are set, otherwise a
/// process-local store.
pub fn log_store(timeout: Duration) -> anyhow::Result<Arc<dyn RunLogStore>> {
    match SupabaseConfig::from_env() {
        Some(config) => {
            info!(url = %config.url, "using Supabase run log");
            Ok(Arc::new(SupabaseLogStore::new(config.with_timeout(timeout))?))
        }
        None => {
            warn!("SUPABASE_URL or SUPABASE_KEY not set; run logs are kept in memory only");
            Ok(Arc::new(MemoryLogStore::new()))
        }
    }
}

/// Builds the executor from environment configuration.
///
/// Missing API keys are not reported here; the first agent call fails with a
/// configuration error instead.
pub fn executor(
    timeout: Duration,
    log_store: Arc<dyn RunLogStore>,
) -> anyhow::Result<PipelineExecutor> {
    let config = PipelineConfig::from_env()?;
    let generator = GeminiProvider::new(GeminiConfig::from_env().with_timeout(timeout))?;
    let searcher = TavilyClient::new(TavilyConfig::from_env().with_timeout(timeout))?;

    info!(
        model = config.model.as_ref().map_or("provider default", |m| m.as_str()),
        fact_check_model = %config.fact_check_model,
        max_fact_check_attempts = config.max_fact_check_attempts,
        "pipeline configured"
    );
    Ok(PipelineExecutor::new(
        Arc::new(generator),
        Arc::new(searcher),
        log_store,
        &config,
    ))
}
