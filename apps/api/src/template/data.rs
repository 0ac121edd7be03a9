//! Lenient accessors over untyped CV data.
//!
//! The LLM output is free-form JSON, so nothing here can fail: a missing key,
//! a `null`, or a value of the wrong shape always resolves to "nothing".

use std::fmt;

use serde_json::Value;

/// A dot-addressed path into the CV data (`name`, `contact.email`, `experience_items.0.company`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPath(Vec<String>);

impl DataPath {
    /// Builds a path from its dotted form. Callers guarantee no empty segments.
    pub fn parse(dotted: &str) -> Self {
        Self(dotted.split('.').map(str::to_string).collect())
    }

    /// Walks `data` segment by segment. Array segments may be addressed by index.
    pub fn resolve<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(data, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Whether the path addresses a link field (`linkedin_url`, `contact.website_url`).
    pub fn is_url_field(&self) -> bool {
        self.0.last().is_some_and(|key| key.ends_with("_url"))
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Text shown for a scalar value. `null`, arrays and objects have no text.
pub fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Truthiness used by conditional blocks.
///
/// Absent, `null`, `false`, `0`, `""` and `[]` are falsy; everything else is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => true,
    }
}

/// Optional text field of an item; whitespace-only counts as absent.
pub fn text_field(item: &Value, key: &str) -> Option<String> {
    let text = scalar_text(item.get(key));
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Sequence-of-strings field of an item.
///
/// A bare string is treated as a one-element list. Elements without text are dropped.
pub fn text_list(item: &Value, key: &str) -> Vec<String> {
    match item.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| scalar_text(Some(v)))
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}
