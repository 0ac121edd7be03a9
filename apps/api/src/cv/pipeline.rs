//! CV pipeline — orchestrates one upload end to end.
//!
//! Flow: validate upload → extract text (blocking pool) → structure via LLM →
//!       fill template → derive export filename.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::cv::structurer::CvStructurer;
use crate::errors::AppError;
use crate::export::pdf_filename;
use crate::extraction::{ensure_pdf, extract_text_blocking};
use crate::state::AppState;
use crate::template::Template;

/// A file received from the upload form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Result of a full upload run: the preview plus the data behind it.
#[derive(Debug, Serialize)]
pub struct ProcessedCv {
    pub html: String,
    pub pdf_filename: String,
    pub cv_data: Value,
}

#[derive(Debug, Serialize)]
pub struct RenderedCv {
    pub html: String,
    pub pdf_filename: String,
}

pub async fn process_upload(state: &AppState, upload: Upload) -> Result<ProcessedCv, AppError> {
    let upload_id = Uuid::new_v4();
    let span = info_span!(
        "process_upload",
        %upload_id,
        file = upload.file_name.as_deref().unwrap_or("<unnamed>")
    );

    async move {
        ensure_pdf(upload.content_type.as_deref(), &upload.bytes)?;
        info!(bytes = upload.bytes.len(), "Accepted PDF upload");

        let text = extract_text_blocking(upload.bytes).await?;
        structure_and_render(state.structurer.as_ref(), &state.template, &text).await
    }
    .instrument(span)
    .await
}

/// Structures extracted CV text and renders it.
pub async fn structure_and_render(
    structurer: &dyn CvStructurer,
    template: &Template,
    cv_text: &str,
) -> Result<ProcessedCv, AppError> {
    let cv_data = structurer.structure(cv_text).await?;
    let RenderedCv { html, pdf_filename } = render_cv(template, &cv_data);

    info!(html_bytes = html.len(), %pdf_filename, "CV rendered");
    Ok(ProcessedCv {
        html,
        pdf_filename,
        cv_data,
    })
}

/// Renders already-structured CV data. Never fails.
pub fn render_cv(template: &Template, cv_data: &Value) -> RenderedCv {
    let html = template.render(Some(cv_data));
    let pdf_filename = pdf_filename(&html);
    RenderedCv { html, pdf_filename }
}
