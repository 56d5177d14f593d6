//! Error type for handlers, mapped to HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ApiError,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The upstream API could not be reached or timed out.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream answered with a non-2xx status where a typed result was needed.
    #[error("Upstream responded with status {0}")]
    UpstreamStatus(u16),

    /// The upstream answered, but not with JSON.
    #[error("Upstream returned an unreadable body: {0}")]
    UpstreamBody(String),

    /// The upstream answered with JSON of an unexpected shape.
    #[error("Upstream body did not match the expected schema: {0}")]
    UpstreamSchema(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream(_)
            | AppError::UpstreamStatus(_)
            | AppError::UpstreamBody(_)
            | AppError::UpstreamSchema(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Upstream(_) => "UPSTREAM_UNAVAILABLE",
            AppError::UpstreamStatus(_) => "UPSTREAM_STATUS",
            AppError::UpstreamBody(_) => "UPSTREAM_BAD_BODY",
            AppError::UpstreamSchema(_) => "UPSTREAM_BAD_SCHEMA",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Upstream(e) => {
                tracing::error!(error = %e, "upstream request failed");
                "The upstream API is unavailable".to_string()
            }
            AppError::UpstreamStatus(status) => {
                tracing::warn!(status, "upstream rejected request");
                format!("The upstream API responded with status {status}")
            }
            AppError::UpstreamBody(msg) => {
                tracing::error!(error = %msg, "upstream body was not JSON");
                "The upstream API returned an unreadable response".to_string()
            }
            AppError::UpstreamSchema(msg) => {
                tracing::error!(error = %msg, "upstream body had an unexpected shape");
                "The upstream API returned an unexpected response shape".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "An internal error occurred".to_string()
            }
        };

        let body = ErrorBody {
            error: ApiError {
                code: self.code(),
                message,
            },
        };
        (self.status(), Json(body)).into_response()
    }
}
