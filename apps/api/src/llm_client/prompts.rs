// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Instruction that forbids inventing résumé content.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Use ONLY information present in the source text. \
    Do NOT infer, embellish, or invent details. \
    If a field is not present in the source, use null (or an empty array for lists).";
