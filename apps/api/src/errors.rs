use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Template degradation is deliberately absent: rendering never fails.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not a PDF: {0}")]
    NotAPdf(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("LLM transport error: {0}")]
    LlmTransport(String),

    #[error("Invalid structured output: {0}")]
    InvalidStructuredOutput(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        if err.is_rejection() {
            AppError::NotAPdf(err.to_string())
        } else {
            AppError::Extraction(err.to_string())
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => AppError::InvalidStructuredOutput(e.to_string()),
            LlmError::Api { status, message } => {
                AppError::LlmTransport(format!("Status: {status}, Details: {message}"))
            }
            other => AppError::LlmTransport(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotAPdf(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "NOT_A_PDF",
                msg.clone(),
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Extraction(msg) => {
                tracing::warn!("Extraction error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    format!("Processing failed: {msg}"),
                )
            }
            AppError::LlmTransport(msg) => {
                tracing::error!("LLM transport error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_TRANSPORT_ERROR",
                    format!("Failed to get response from LLM. {msg}"),
                )
            }
            AppError::InvalidStructuredOutput(msg) => {
                tracing::error!("LLM output is not valid JSON: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "INVALID_STRUCTURED_OUTPUT",
                    "LLM provided invalid JSON. Please refine the prompt for structured output."
                        .to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
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
