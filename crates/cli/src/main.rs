//! Draftsmith CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: flags first, then environment variables, then
//!    defaults.
//! 2. **Wire observability**: `tracing-subscriber` with a text or JSON layer on
//!    stderr, and an OpenTelemetry OTLP exporter when
//!    `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! 3. **Construct infrastructure**: `GeminiProvider`, `TavilyClient` and a run
//!    log store (Supabase or in-memory), injected into `PipelineExecutor`.
//! 4. **Run the command**:
//!    - `generate` runs one document read from a file or stdin.
//!    - `serve` starts the HTTP trigger.
//!    - `logs` prints the stored timeline of one run.

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pipeline::{Document, RunId, RunLogStore};
use tracing::info;

mod telemetry;
mod wiring;

use telemetry::LogFormat;

#[derive(Debug, Parser)]
#[command(
    name = "draftsmith",
    version,
    about = "Turns a product-requirements document into a fact-checked blog post"
)]
struct Cli {
    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Timeout for each outbound HTTP request, in seconds.
    #[arg(
        long,
        global = true,
        env = "DRAFTSMITH_HTTP_TIMEOUT_SECS",
        default_value_t = 120
    )]
    http_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the pipeline once and print the polished post.
    Generate {
        /// File holding the document; `-` or absent reads stdin.
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Print the full run result as JSON instead of the post alone.
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP API.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "DRAFTSMITH_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Print the agent log entries of a run, oldest first.
    Logs {
        /// Run identifier (UUID).
        run_id: RunId,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init(cli.log_format)?;

    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "command failed");
    }

    telemetry.shutdown();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(cli.http_timeout_secs);
    let log_store = wiring::log_store(timeout)?;

    match cli.command {
        Command::Generate { input, json } => {
            let document = read_document(input)?;
            let executor = wiring::executor(timeout, log_store)?;
            let result = executor.generate(&document).await?;
            info!(
                run_id = %result.run_id,
                fact_check_passed = result.fact_check_passed,
                "run finished"
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.final_post);
            }
        }
        Command::Serve { bind } => {
            let executor = wiring::executor(timeout, Arc::clone(&log_store))?;
            let state = listener::AppState::new(Arc::new(executor), log_store);
            listener::serve(bind, state)
                .await
                .with_context(|| format!("HTTP server on {bind} failed"))?;
        }
        Command::Logs { run_id } => {
            let entries = log_store.list_run(run_id).await?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

fn read_document(input: Option<PathBuf>) -> anyhow::Result<Document> {
    let text = match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read document from stdin")?;
            buf
        }
    };
    match Document::new(text) {
        Some(document) => Ok(document),
        None => bail!("input document is empty"),
    }
}
