use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::{InputValidationError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction service unavailable: {0}")]
    Unavailable(String),

    #[error("extraction returned malformed content: {0}")]
    Malformed(String),

    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),
}

impl From<ValidationError> for ExtractionError {
    fn from(err: ValidationError) -> Self {
        ExtractionError::Malformed(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt audit record: {0}")]
    Corrupt(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidInput(#[from] InputValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Unexpected(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
