use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::industry::DataError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Lookup misses are never errors; only load-time failures and external
/// service failures reach the caller as error bodies.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::DataSource { .. } => AppError::DataSource(err.to_string()),
            DataError::Schema { .. } => AppError::Schema(err.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::DataSource(msg) => {
                tracing::error!("Data source error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "DATA_SOURCE_ERROR",
                    msg.clone(),
                )
            }
            AppError::Schema(msg) => {
                tracing::error!("Schema error: {msg}");
                (StatusCode::SERVICE_UNAVAILABLE, "SCHEMA_ERROR", msg.clone())
            }
            AppError::ExternalService(msg) => {
                tracing::error!("External service error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTERNAL_SERVICE_ERROR",
                    "The AI assistant is unavailable; deterministic results remain valid"
                        .to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
