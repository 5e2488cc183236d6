//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use vscore_analysis::PipelineError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned for unexpected failures in production.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{detail}")]
    Internal { detail: String, expose_detail: bool },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Unexpected failure. `detail` is always logged and only echoed to the
    /// client when `expose_detail` is set (outside production).
    pub fn internal(detail: impl Into<String>, expose_detail: bool) -> Self {
        Self::Internal {
            detail: detail.into(),
            expose_detail,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            // Rejected URLs and unprocessable videos are both the caller's problem
            ApiError::BadRequest(_) | ApiError::Pipeline(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let error = match &self {
            ApiError::Internal {
                detail,
                expose_detail,
            } => {
                tracing::error!(error = %detail, "Unhandled error");
                if *expose_detail {
                    format!("{}: {}", INTERNAL_ERROR_MESSAGE, detail)
                } else {
                    INTERNAL_ERROR_MESSAGE.to_string()
                }
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
