//! PDF text extraction — upload validation plus a thin wrapper over `pdf-extract`.
//!
//! Extraction is CPU-bound and `pdf-extract` can panic on hostile input, so the
//! async entry point runs it inside `tokio::task::spawn_blocking`, which also
//! turns a panic into an ordinary error.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";
/// The PDF header must appear within the first 1024 bytes.
const PDF_HEADER_WINDOW: usize = 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Please upload a PDF file (received {0})")]
    UnsupportedMediaType(String),

    #[error("The uploaded file is empty")]
    EmptyUpload,

    #[error("The uploaded file is not a valid PDF")]
    MissingPdfHeader,

    #[error("Failed to extract text from PDF: {0}")]
    Extract(String),

    #[error("The PDF contains no extractable text")]
    NoText,

    #[error("PDF extraction task failed: {0}")]
    Task(String),
}

impl ExtractionError {
    /// True when the upload was rejected before any extraction was attempted.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ExtractionError::UnsupportedMediaType(_)
                | ExtractionError::EmptyUpload
                | ExtractionError::MissingPdfHeader
        )
    }
}

/// Rejects uploads that are not PDFs, by declared media type and by header bytes.
pub fn ensure_pdf(content_type: Option<&str>, bytes: &[u8]) -> Result<(), ExtractionError> {
    if let Some(content_type) = content_type {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if !essence.eq_ignore_ascii_case(PDF_MEDIA_TYPE) {
            return Err(ExtractionError::UnsupportedMediaType(essence.to_string()));
        }
    }

    if bytes.is_empty() {
        return Err(ExtractionError::EmptyUpload);
    }

    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    if !window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
        return Err(ExtractionError::MissingPdfHeader);
    }

    Ok(())
}

/// Extracts plain text from PDF bytes. Pages are separated by a blank line.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Extract(e.to_string()))?;

    debug!(pages = pages.len(), "Extracted PDF pages");

    let text = join_pages(&pages);
    if text.is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(text)
}

/// Runs [`extract_text`] on the blocking pool.
pub async fn extract_text_blocking(bytes: Bytes) -> Result<String, ExtractionError> {
    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))??;

    info!(bytes = size, chars = text.len(), "PDF text extracted");
    Ok(text)
}

fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page.trim());
        text.push_str("\n\n");
    }
    text.trim().to_string()
}
