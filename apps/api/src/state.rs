use std::sync::Arc;

use crate::config::Config;
use crate::cv::structurer::CvStructurer;
use crate::template::Template;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable CV structurer. Default: LlmCvStructurer (Gemini).
    pub structurer: Arc<dyn CvStructurer>,
    /// Parsed once at startup, read-only afterwards.
    pub template: Arc<Template>,
    pub config: Config,
}
