//! Axum route handlers for the CV API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::cv::pipeline::{process_upload, render_cv, ProcessedCv, RenderedCv, Upload};
use crate::errors::AppError;
use crate::state::AppState;

/// Multipart field carrying the PDF.
const FILE_FIELD: &str = "file";

/// POST /api/v1/cv/process
///
/// Multipart upload of a PDF résumé. Returns the rendered preview, the export
/// filename and the structured data the LLM produced.
pub async fn handle_process(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessedCv>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        upload = Some(Upload {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let upload = upload.ok_or_else(|| {
        AppError::Validation(format!("Multipart field '{FILE_FIELD}' is required"))
    })?;

    let processed = process_upload(&state, upload).await?;
    Ok(Json(processed))
}

/// Body-limit overruns surface as multipart errors; keep them distinct from malformed forms.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

/// POST /api/v1/cv/render
///
/// Renders already-structured CV data, e.g. after the user edited the JSON.
/// Any JSON is accepted; unexpected shapes render as empty fields.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(cv_data): Json<Value>,
) -> Json<RenderedCv> {
    Json(render_cv(&state.template, &cv_data))
}
