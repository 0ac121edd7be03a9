//! CV template filling.
//!
//! A template is parsed once into a node tree and rendered by a single walk
//! over that tree. Rendering is infallible: whatever shape the CV data has,
//! missing or malformed fields collapse to empty output. Every substituted
//! value is HTML-escaped.
//!
//! Section rules:
//! - `experience` / `education` / `projects` / `skills` are kept only when the
//!   matching collection renders at least one item.
//! - `profile` / `profile_summary` is kept only when `profile_summary` has
//!   non-whitespace text.
//! - any other section name is kept when the same-named field is truthy.
//!
//! Fields named `*_url` only resolve when they hold an http(s) URL, so a
//! placeholder inside `href="…"` can never produce another scheme.

pub mod data;
pub mod escape;
pub mod items;
mod parser;

use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::template::data::{is_truthy, scalar_text, DataPath};
use crate::template::escape::escape_html;
use crate::template::items::{is_linkable, Collection};

/// The built-in CV template.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/cv-template.html");

const PROFILE_SUMMARY_KEY: &str = "profile_summary";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("Unrecognised template tag at byte {offset}")]
    StrayTag { offset: usize },

    #[error("Closing if-tag at byte {offset} has no opening tag")]
    UnexpectedEndIf { offset: usize },

    #[error("END_SECTION:{name} at byte {offset} has no matching START_SECTION")]
    UnexpectedEndSection { name: String, offset: usize },

    #[error("END_SECTION:{found} at byte {offset} does not close START_SECTION:{expected}")]
    MismatchedEndSection {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("'{tag}' opened at byte {offset} is never closed")]
    Unclosed { tag: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Placeholder(DataPath),
    Conditional { path: DataPath, body: Vec<Node> },
    Section { name: String, body: Vec<Node> },
    Insertion(Collection),
}

/// A parsed, immutable template. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let nodes = parser::parse(source)?;
        Ok(Self { nodes })
    }

    pub fn builtin() -> Result<Self, TemplateError> {
        Self::parse(DEFAULT_TEMPLATE)
    }

    /// Loads and parses a template file. Used at startup only.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CV template: {}", path.display()))?;
        Self::parse(&source)
            .with_context(|| format!("Failed to parse CV template: {}", path.display()))
    }

    /// Renders the template against CV data.
    ///
    /// Missing (`None` or JSON `null`) data is a caller error: it is logged and
    /// the result is an empty string.
    pub fn render(&self, data: Option<&Value>) -> String {
        let data = match data {
            Some(Value::Null) | None => {
                warn!("No CV data provided to fill the template");
                return String::new();
            }
            Some(data) => data,
        };

        let ctx = RenderContext::new(data);
        let mut out = String::new();
        ctx.render_nodes(&self.nodes, &mut out);
        out
    }
}

/// Parses `template` and renders it against `data` in one go.
#[allow(dead_code)]
pub fn fill_template(template: &str, data: Option<&Value>) -> Result<String, TemplateError> {
    Ok(Template::parse(template)?.render(data))
}

struct RenderContext<'a> {
    data: &'a Value,
    experience: String,
    education: String,
    projects: String,
    skills: String,
}

impl<'a> RenderContext<'a> {
    fn new(data: &'a Value) -> Self {
        Self {
            data,
            experience: Collection::Experience.render(data),
            education: Collection::Education.render(data),
            projects: Collection::Projects.render(data),
            skills: Collection::Skills.render(data),
        }
    }

    fn items(&self, collection: Collection) -> &str {
        match collection {
            Collection::Experience => &self.experience,
            Collection::Education => &self.education,
            Collection::Projects => &self.projects,
            Collection::Skills => &self.skills,
        }
    }

    fn render_nodes(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Placeholder(path) => {
                    out.push_str(&escape_html(&scalar_text(self.lookup(path))))
                }
                Node::Conditional { path, body } => {
                    if is_truthy(self.lookup(path)) {
                        self.render_nodes(body, out);
                    }
                }
                Node::Section { name, body } => {
                    if self.section_visible(name) {
                        self.render_nodes(body, out);
                    } else {
                        debug!(section = %name, "Removing empty CV section");
                    }
                }
                Node::Insertion(collection) => out.push_str(self.items(*collection)),
            }
        }
    }

    fn lookup(&self, path: &DataPath) -> Option<&'a Value> {
        let value = path.resolve(self.data)?;
        if path.is_url_field() && !value.as_str().is_some_and(is_linkable) {
            debug!(field = %path, "Dropping non-http(s) link");
            return None;
        }
        Some(value)
    }

    fn section_visible(&self, name: &str) -> bool {
        if let Some(collection) = Collection::from_section_name(name) {
            return !self.items(collection).trim().is_empty();
        }
        if name == "profile" || name == PROFILE_SUMMARY_KEY {
            let summary = scalar_text(self.data.get(PROFILE_SUMMARY_KEY));
            return !summary.trim().is_empty();
        }
        is_truthy(self.data.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LONG_URL: &str = "https://example.com/a/very/long/path/that/exceeds/thirty/chars";

    fn full_cv() -> Value {
        json!({
            "name": "Ada Lovelace",
            "title": "Analyst",
            "email": "ada@example.com",
            "phone": "+44 1234",
            "linkedin_url": "https://linkedin.com/in/ada",
            "github_url": "https://github.com/ada",
            "website_url": "",
            "location": "London",
            "profile_summary": "Writes the first programs.",
            "experience_items": [{
                "job_title": "Analyst",
                "company": "Analytical Engine Co",
                "location": "London",
                "dates": "1842 - 1843",
                "responsibilities": ["Wrote notes", "Computed Bernoulli numbers"]
            }],
            "education_items": [{
                "degree": "Private tutoring",
                "institution": "Home",
                "dates": "1820s",
                "notes": "Mathematics and science"
            }],
            "project_items": [{
                "project_name": "Note G",
                "dates": "1843",
                "description": ["First published algorithm"],
                "project_url": LONG_URL
            }],
            "skills_categories": [
                { "category_name": "Math", "skills": ["Calculus", "Algebra"] }
            ]
        })
    }

    fn has_residual_syntax(html: &str) -> bool {
        html.contains("{{")
            || html.contains("}}")
            || html.contains("START_SECTION")
            || html.contains("END_SECTION")
            || html.contains("_PLACEHOLDER")
    }

    #[test]
    fn test_header_links_require_http_scheme() {
        let data = json!({
            "name": "Ada",
            "linkedin_url": "javascript:alert(document.domain)",
            "github_url": "https://github.com/ada",
            "website_url": "data:text/html,<script>alert(1)</script>"
        });
        let html = Template::builtin().unwrap().render(Some(&data));
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("data:text"));
        assert!(!html.contains(">LinkedIn</a>"));
        assert!(!html.contains(">Website</a>"));
        assert!(html.contains(r#"<a href="https://github.com/ada""#));
    }

    #[test]
    fn test_url_placeholder_outside_conditional_is_empty() {
        let src = r#"<a href="{{contact.site_url}}">{{name}}</a>"#;
        let data = json!({ "name": "Ada", "contact": { "site_url": "javascript:alert(1)" } });
        assert_eq!(fill_template(src, Some(&data)).unwrap(), r#"<a href="">Ada</a>"#);

        let data = json!({ "name": "Ada", "contact": { "site_url": "https://ada.dev" } });
        assert_eq!(
            fill_template(src, Some(&data)).unwrap(),
            r#"<a href="https://ada.dev">Ada</a>"#
        );
    }

    #[test]
    fn test_default_template_parses() {
        assert!(Template::builtin().is_ok());
    }

    #[test]
    fn test_full_cv_renders_every_section() {
        let html = Template::builtin().unwrap().render(Some(&full_cv()));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("Writes the first programs."));
        assert!(html.contains("experience-item"));
        assert!(html.contains("education-item"));
        assert!(html.contains("project-item"));
        assert!(html.contains("skills-category-group"));
        assert!(!has_residual_syntax(&html));
    }

    #[test]
    fn test_no_residual_syntax_for_any_shape() {
        let template = Template::builtin().unwrap();
        let inputs = [
            json!({}),
            json!([]),
            json!("just a string"),
            json!(42),
            json!({ "experience_items": "oops", "skills_categories": { "a": 1 } }),
            json!({ "name": null, "project_items": [null, 1, "x", []] }),
            full_cv(),
        ];
        for input in inputs {
            let html = template.render(Some(&input));
            assert!(!has_residual_syntax(&html), "residual syntax for {input}");
        }
    }

    #[test]
    fn test_empty_collections_remove_sections_structurally() {
        let data = json!({
            "name": "Ada",
            "experience_items": [],
            "education_items": [],
            "project_items": [],
            "skills_categories": [],
        });
        let html = Template::builtin().unwrap().render(Some(&data));
        for heading in ["Experience", "Education", "Projects", "Skills"] {
            assert!(!html.contains(&format!(">{heading}</h2>")), "{heading} left in output");
        }
        assert!(!has_residual_syntax(&html));
    }

    #[test]
    fn test_section_removed_with_enclosed_literal_content() {
        let src = "a<!-- START_SECTION:experience --><h2>Experience</h2><!-- EXPERIENCE_ITEMS_PLACEHOLDER --><!-- END_SECTION:experience -->b";
        let html = fill_template(src, Some(&json!({ "experience_items": [] }))).unwrap();
        assert_eq!(html, "ab");
    }

    #[test]
    fn test_section_kept_when_items_render() {
        let src = "<!-- START_SECTION:projects --><h2>Projects</h2><!-- PROJECTS_ITEMS_PLACEHOLDER --><!-- END_SECTION:projects -->";
        let html = fill_template(src, Some(&json!({ "project_items": [{ "project_name": "X" }] }))).unwrap();
        assert!(html.starts_with("<h2>Projects</h2>"));
        assert!(html.contains(">X</h3>"));
    }

    #[test]
    fn test_skills_section_removed_when_every_category_is_empty() {
        let src = "<!-- START_SECTION:skills -->S<!-- SKILLS_CATEGORIES_PLACEHOLDER --><!-- END_SECTION:skills -->";
        let data = json!({ "skills_categories": [{ "category_name": "A", "skills": [] }] });
        assert_eq!(fill_template(src, Some(&data)).unwrap(), "");
    }

    #[test]
    fn test_skills_one_empty_one_full_category() {
        let data = json!({
            "skills_categories": [
                { "category_name": "Nothing", "skills": [] },
                { "category_name": "Languages", "skills": ["Rust", "Python"] }
            ]
        });
        let html = Template::builtin().unwrap().render(Some(&data));
        assert_eq!(html.matches("skills-category-group").count(), 1);
        let rust = html.find("<span>Rust</span>").unwrap();
        let python = html.find("<span>Python</span>").unwrap();
        assert!(rust < python);
    }

    #[test]
    fn test_project_long_url_anchor() {
        let data = json!({ "project_items": [{ "project_name": "P", "project_url": LONG_URL }] });
        let html = Template::builtin().unwrap().render(Some(&data));
        assert!(html.contains(&format!(r#"href="{LONG_URL}""#)));
        assert!(html.contains(&format!(">{}...</a>", &LONG_URL[..27])));
    }

    #[test]
    fn test_project_invalid_url_as_text() {
        let data = json!({ "project_items": [{ "project_name": "P", "project_url": "not a url" }] });
        let html = fill_template("<!-- PROJECTS_ITEMS_PLACEHOLDER -->", Some(&data)).unwrap();
        assert!(html.contains("not a url"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_null_data_returns_empty_string() {
        let template = Template::builtin().unwrap();
        assert_eq!(template.render(None), "");
        assert_eq!(template.render(Some(&Value::Null)), "");
    }

    #[test]
    fn test_whitespace_profile_summary_removes_section() {
        let data = json!({ "name": "Ada", "profile_summary": "   " });
        let html = Template::builtin().unwrap().render(Some(&data));
        assert!(!html.contains("profile-summary"));

        let src = "<!-- START_SECTION:profile -->[{{profile_summary}}]<!-- END_SECTION:profile -->";
        assert_eq!(fill_template(src, Some(&data)).unwrap(), "");
        let data = json!({ "profile_summary": "Hi" });
        assert_eq!(fill_template(src, Some(&data)).unwrap(), "[Hi]");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let template = Template::builtin().unwrap();
        let data = full_cv();
        assert_eq!(template.render(Some(&data)), template.render(Some(&data)));
    }

    #[test]
    fn test_placeholders_are_escaped() {
        let data = json!({ "name": "<script>alert('x')</script>" });
        let html = fill_template("<h1>{{name}}</h1>", Some(&data)).unwrap();
        assert_eq!(html, "<h1>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</h1>");
    }

    #[test]
    fn test_nested_placeholder_and_missing_segments() {
        let data = json!({ "contact": { "email": "a@b.c" } });
        let html = fill_template("{{contact.email}}|{{contact.phone}}|{{x.y.z}}", Some(&data)).unwrap();
        assert_eq!(html, "a@b.c||");
    }

    #[test]
    fn test_conditional_blocks_follow_truthiness() {
        let src = "{{#if github_url}}<a href=\"{{github_url}}\">GitHub</a>{{/if}}";
        let with = fill_template(src, Some(&json!({ "github_url": "https://github.com/ada" }))).unwrap();
        assert_eq!(with, "<a href=\"https://github.com/ada\">GitHub</a>");
        let empty = fill_template(src, Some(&json!({ "github_url": "" }))).unwrap();
        assert_eq!(empty, "");
        let missing = fill_template(src, Some(&json!({}))).unwrap();
        assert_eq!(missing, "");
    }

    #[test]
    fn test_conditional_on_nested_path_and_arrays() {
        let src = "{{#if contact.email}}E{{/if}}{{#if experience_items}}X{{/if}}";
        let data = json!({ "contact": { "email": "a@b.c" }, "experience_items": [] });
        assert_eq!(fill_template(src, Some(&data)).unwrap(), "E");
        let data = json!({ "experience_items": [{}] });
        assert_eq!(fill_template(src, Some(&data)).unwrap(), "X");
    }

    #[test]
    fn test_conditional_zero_is_falsy() {
        // Numeric 0 hides the block, e.g. a "years_experience" of 0.
        let src = "{{#if years_experience}}{{years_experience}} years{{/if}}";
        assert_eq!(fill_template(src, Some(&json!({ "years_experience": 0 }))).unwrap(), "");
        assert_eq!(
            fill_template(src, Some(&json!({ "years_experience": 5 }))).unwrap(),
            "5 years"
        );
    }

    #[test]
    fn test_unknown_section_uses_field_truthiness() {
        let src = "<!-- START_SECTION:awards -->A<!-- END_SECTION:awards -->";
        assert_eq!(fill_template(src, Some(&json!({ "awards": ["x"] }))).unwrap(), "A");
        assert_eq!(fill_template(src, Some(&json!({ "awards": [] }))).unwrap(), "");
    }

    #[test]
    fn test_insertion_outside_section_still_spliced() {
        let data = json!({ "education_items": [{ "degree": "BSc" }] });
        let html = fill_template("<!-- EDUCATION_ITEMS_PLACEHOLDER -->", Some(&data)).unwrap();
        assert!(html.contains(">BSc</h3>"));
    }

    #[test]
    fn test_malformed_template_is_an_error() {
        assert!(fill_template("{{#if name}}", Some(&json!({}))).is_err());
    }

    #[test]
    fn test_from_file_missing_template() {
        let err = Template::from_file(Path::new("/nonexistent/cv-template.html")).unwrap_err();
        assert!(err.to_string().contains("Failed to read CV template"));
    }
}
