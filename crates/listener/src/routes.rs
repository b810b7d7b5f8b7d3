//! Route handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use pipeline::{Document, LogEntry, RunId, RunResult};
use serde_json::Value;
use tracing::{error, info};

use crate::error::{ApiError, ApiResponse};
use crate::AppState;

/// Extracts a non-blank `prd` string from a JSON body.
///
/// Unparseable JSON, a missing field, a non-string value and blank text are
/// all the same client error.
fn parse_prd(body: &[u8]) -> Result<Document, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidPrd)?;
    value
        .get("prd")
        .and_then(Value::as_str)
        .and_then(Document::new)
        .ok_or(ApiError::InvalidPrd)
}

/// `POST /api/generate`
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<RunResult>>, ApiError> {
    let document = parse_prd(&body)?;
    info!(prd_len = document.as_str().len(), "generate request received");

    match state.executor.generate(&document).await {
        Ok(result) => Ok(Json(ApiResponse::success(result))),
        Err(e) => {
            error!(error = %e, stage = %e.stage, "generate request failed");
            Err(e.into())
        }
    }
}

/// `GET /api/runs/{run_id}/logs`
pub async fn run_logs(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<LogEntry>>>, ApiError> {
    let run_id: RunId = run_id
        .parse()
        .map_err(|_| ApiError::InvalidRunId(run_id.clone()))?;
    let entries = state.log_store.list_run(run_id).await.map_err(|e| {
        error!(%run_id, error = %e, "failed to read run logs");
        ApiError::from(e)
    })?;
    Ok(Json(ApiResponse::success(entries)))
}
