//! CV Structurer — pluggable, trait-based conversion of raw CV text into CV data.
//!
//! Default: `LlmCvStructurer` (Gemini via `llm_client`).
//! The output is untyped JSON on purpose: the template filler tolerates any shape.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cv::prompts::build_cv_parse_prompt;
use crate::llm_client::{LlmClient, LlmError};

/// Implement this to swap the structuring backend without touching the
/// pipeline or handlers.
///
/// Carried in `AppState` as `Arc<dyn CvStructurer>`.
#[async_trait]
pub trait CvStructurer: Send + Sync {
    async fn structure(&self, cv_text: &str) -> Result<Value, LlmError>;
}

pub struct LlmCvStructurer {
    llm: LlmClient,
}

impl LlmCvStructurer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CvStructurer for LlmCvStructurer {
    async fn structure(&self, cv_text: &str) -> Result<Value, LlmError> {
        let prompt = build_cv_parse_prompt(cv_text);
        debug!(prompt_chars = prompt.len(), "Requesting structured CV data");

        let data: Value = self.llm.call_json(&prompt).await.map_err(|e| {
            warn!("LLM structuring failed: {e}");
            e
        })?;

        if !data.is_object() {
            warn!("LLM structured output is not a JSON object; rendering will be mostly empty");
        }
        Ok(data)
    }
}
