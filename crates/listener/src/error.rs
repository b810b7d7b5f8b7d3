//! Response envelope and error-to-status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pipeline::{LogStoreError, PipelineError};
use serde::Serialize;
use thiserror::Error;

/// The `{"success": ..}` envelope every route answers with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: 'prd' field is required and must be a non-empty string")]
    InvalidPrd,
    #[error("Invalid run id: {0}")]
    InvalidRunId(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Failed to read run logs: {0}")]
    LogStore(#[from] LogStoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidPrd | ApiError::InvalidRunId(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) | ApiError::LogStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_envelopes_omit_the_unused_side() {
        assert_eq!(
            serde_json::to_value(ApiResponse::success(1)).unwrap(),
            json!({"success": true, "data": 1})
        );
        assert_eq!(
            serde_json::to_value(ApiResponse::<()>::error("boom")).unwrap(),
            json!({"success": false, "error": "boom"})
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidPrd.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidRunId("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::LogStore(LogStoreError::Request {
                message: "timeout".into()
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
