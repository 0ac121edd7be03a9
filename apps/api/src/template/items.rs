//! Per-item HTML for the four repeatable CV collections.
//!
//! Each item type is a lenient view over one JSON element: `from_value` never
//! fails, it only returns `None` when the element is not an object at all.
//! Every field is escaped on the way into the markup.

use serde_json::Value;
use url::Url;

use crate::template::data::{text_field, text_list};
use crate::template::escape::escape_html;

/// Labels longer than this are shortened for display.
const MAX_LINK_LABEL_CHARS: usize = 30;
/// Characters kept before the ellipsis when a label is shortened.
const TRUNCATED_LINK_LABEL_CHARS: usize = 27;

/// The repeatable collections a template can splice items into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Experience,
    Education,
    Projects,
    Skills,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Experience,
        Collection::Education,
        Collection::Projects,
        Collection::Skills,
    ];

    /// Key of the collection in the CV data.
    pub fn data_key(self) -> &'static str {
        match self {
            Collection::Experience => "experience_items",
            Collection::Education => "education_items",
            Collection::Projects => "project_items",
            Collection::Skills => "skills_categories",
        }
    }

    /// Name used in `START_SECTION:<name>` / `END_SECTION:<name>` markers.
    pub fn section_name(self) -> &'static str {
        match self {
            Collection::Experience => "experience",
            Collection::Education => "education",
            Collection::Projects => "projects",
            Collection::Skills => "skills",
        }
    }

    /// Insertion point comment body, without the `<!-- -->` wrapper.
    pub fn insertion_marker(self) -> &'static str {
        match self {
            Collection::Experience => "EXPERIENCE_ITEMS_PLACEHOLDER",
            Collection::Education => "EDUCATION_ITEMS_PLACEHOLDER",
            Collection::Projects => "PROJECTS_ITEMS_PLACEHOLDER",
            Collection::Skills => "SKILLS_CATEGORIES_PLACEHOLDER",
        }
    }

    pub fn from_section_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.section_name() == name)
    }

    pub fn from_insertion_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.insertion_marker() == marker)
    }

    /// Concatenated item HTML. Empty when the collection is absent, not an
    /// array, or has nothing renderable.
    pub fn render(self, data: &Value) -> String {
        let Some(items) = data.get(self.data_key()).and_then(Value::as_array) else {
            return String::new();
        };

        items
            .iter()
            .filter_map(|item| match self {
                Collection::Experience => ExperienceItem::from_value(item).map(|i| i.to_html()),
                Collection::Education => EducationItem::from_value(item).map(|i| i.to_html()),
                Collection::Projects => ProjectItem::from_value(item).map(|i| i.to_html()),
                Collection::Skills => SkillCategory::from_value(item).and_then(|c| c.to_html()),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceItem {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub dates: Option<String>,
    pub responsibilities: Vec<String>,
}

impl ExperienceItem {
    pub fn from_value(value: &Value) -> Option<Self> {
        value.is_object().then(|| Self {
            job_title: text_field(value, "job_title"),
            company: text_field(value, "company"),
            location: text_field(value, "location"),
            dates: text_field(value, "dates"),
            responsibilities: text_list(value, "responsibilities"),
        })
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"
<div class="experience-item">
    <h3 class="text-lg font-semibold text-gray-800">{title}</h3>
    <p class="text-sm text-gray-600">{company}{location}</p>
    <p class="text-sm text-gray-500 italic mb-2">{dates}</p>
    <ul class="bullet-list text-gray-700 text-base">{responsibilities}</ul>
</div>
"#,
            title = escaped(&self.job_title),
            company = escaped(&self.company),
            location = location_suffix(&self.location),
            dates = escaped(&self.dates),
            responsibilities = list_items(&self.responsibilities),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationItem {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub dates: Option<String>,
    pub notes: Option<String>,
}

impl EducationItem {
    pub fn from_value(value: &Value) -> Option<Self> {
        value.is_object().then(|| Self {
            degree: text_field(value, "degree"),
            institution: text_field(value, "institution"),
            location: text_field(value, "location"),
            dates: text_field(value, "dates"),
            notes: text_field(value, "notes"),
        })
    }

    pub fn to_html(&self) -> String {
        let notes = self
            .notes
            .as_deref()
            .map(|n| {
                format!(
                    r#"
    <p class="text-base text-gray-700 mt-1">{}</p>"#,
                    escape_html(n)
                )
            })
            .unwrap_or_default();

        format!(
            r#"
<div class="education-item">
    <h3 class="text-lg font-semibold text-gray-800">{degree}</h3>
    <p class="text-sm text-gray-600">{institution}{location}</p>
    <p class="text-sm text-gray-500 italic">{dates}</p>{notes}
</div>
"#,
            degree = escaped(&self.degree),
            institution = escaped(&self.institution),
            location = location_suffix(&self.location),
            dates = escaped(&self.dates),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectItem {
    pub project_name: Option<String>,
    pub dates: Option<String>,
    pub description: Vec<String>,
    pub project_url: Option<String>,
}

impl ProjectItem {
    pub fn from_value(value: &Value) -> Option<Self> {
        value.is_object().then(|| Self {
            project_name: text_field(value, "project_name"),
            dates: text_field(value, "dates"),
            description: text_list(value, "description"),
            project_url: text_field(value, "project_url").map(|u| u.trim().to_string()),
        })
    }

    pub fn to_html(&self) -> String {
        let link = self
            .project_url
            .as_deref()
            .map(|url| format!("\n    {}", project_link(url)))
            .unwrap_or_default();

        format!(
            r#"
<div class="project-item">
    <h3 class="text-lg font-semibold text-gray-800">{name}</h3>
    <p class="text-sm text-gray-500 italic mb-2">{dates}</p>
    <ul class="bullet-list text-gray-700 text-base">{description}</ul>{link}
</div>
"#,
            name = escaped(&self.project_name),
            dates = escaped(&self.dates),
            description = list_items(&self.description),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillCategory {
    pub category_name: Option<String>,
    pub skills: Vec<String>,
}

impl SkillCategory {
    pub fn from_value(value: &Value) -> Option<Self> {
        value.is_object().then(|| Self {
            category_name: text_field(value, "category_name"),
            skills: text_list(value, "skills"),
        })
    }

    /// `None` when the category has no skills; such categories are skipped
    /// even when sibling categories render.
    pub fn to_html(&self) -> Option<String> {
        if self.skills.is_empty() {
            return None;
        }

        let tags: String = self
            .skills
            .iter()
            .map(|s| format!("<span>{}</span>", escape_html(s)))
            .collect();

        Some(format!(
            r#"
<div class="skills-category-group">
    <h3>{name}</h3>
    <div class="skills-grid">{tags}</div>
</div>
"#,
            name = escaped(&self.category_name),
        ))
    }
}

/// Anchor for a valid http(s) URL, plain text otherwise.
///
/// Only the visible label is shortened; the `href` always carries the full URL.
pub fn project_link(raw: &str) -> String {
    if !is_linkable(raw) {
        return format!(
            r#"<span class="project-url text-gray-600 text-sm mt-2">{}</span>"#,
            escape_html(raw)
        );
    }

    format!(
        r#"<a href="{href}" target="_blank" rel="noopener noreferrer" class="project-url text-indigo-600 hover:underline text-sm mt-2">{label}</a>"#,
        href = escape_html(raw),
        label = escape_html(&link_label(raw)),
    )
}

/// Whether `raw` may be rendered as a clickable link: an absolute http(s) URL.
pub fn is_linkable(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Display label for a link, shortened to 27 characters plus `...` past 30.
pub fn link_label(raw: &str) -> String {
    if raw.chars().count() <= MAX_LINK_LABEL_CHARS {
        return raw.to_string();
    }
    let head: String = raw.chars().take(TRUNCATED_LINK_LABEL_CHARS).collect();
    format!("{head}...")
}

fn escaped(field: &Option<String>) -> String {
    field.as_deref().map(escape_html).unwrap_or_default()
}

fn location_suffix(location: &Option<String>) -> String {
    location
        .as_deref()
        .map(|l| format!(" | {}", escape_html(l)))
        .unwrap_or_default()
}

fn list_items(entries: &[String]) -> String {
    entries
        .iter()
        .map(|e| format!("<li>{}</li>", escape_html(e)))
        .collect()
}
