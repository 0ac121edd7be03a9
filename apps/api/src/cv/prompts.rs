// CV structuring prompt templates.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NO_INVENTION_INSTRUCTION};

pub const CV_PARSE_PREAMBLE: &str = r#"You are a precise CV/résumé data extractor.
Convert the raw CV text below into a single JSON object with exactly this structure:

{
  "name": "string",
  "title": "string (current or target professional title)",
  "email": "string",
  "phone": "string",
  "linkedin_url": "string (full URL)",
  "github_url": "string (full URL)",
  "website_url": "string (full URL)",
  "location": "string (city, country)",
  "profile_summary": "string (2-4 sentence professional summary)",
  "experience_items": [
    {
      "job_title": "string",
      "company": "string",
      "location": "string",
      "dates": "string (e.g. 'Jan 2020 - Present')",
      "responsibilities": ["string"]
    }
  ],
  "education_items": [
    {
      "degree": "string",
      "institution": "string",
      "location": "string",
      "dates": "string",
      "notes": "string (honours, thesis, GPA)"
    }
  ],
  "project_items": [
    {
      "project_name": "string",
      "dates": "string",
      "description": ["string"],
      "project_url": "string (full URL)"
    }
  ],
  "skills_categories": [
    {
      "category_name": "string",
      "skills": ["string"]
    }
  ]
}

RULES:
1. Keep the original order of jobs, degrees and projects.
2. Each responsibility and description entry is one concise bullet point.
3. Group skills into meaningful categories (e.g. Languages, Frameworks, Tools)."#;

/// Builds the full structuring prompt for one CV.
pub fn build_cv_parse_prompt(cv_text: &str) -> String {
    format!(
        "{CV_PARSE_PREAMBLE}\n4. {NO_INVENTION_INSTRUCTION}\n5. {JSON_ONLY_INSTRUCTION}\n\nRaw CV Text to Process:\n```\n{cv_text}\n```"
    )
}
