// CV processing: upload → text → structured data → rendered preview.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod structurer;
