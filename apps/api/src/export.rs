//! PDF export naming.
//!
//! The browser rasterizes the preview into a PDF; the server only decides the
//! download filename, taken from the rendered document's `<title>`.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_PDF_FILENAME: &str = "cv.pdf";

static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Filename for the exported PDF: the `<title>` text, made filesystem-safe,
/// or `cv.pdf` when the title is missing or blank.
pub fn pdf_filename(html: &str) -> String {
    let Some(title) = RE_TITLE.captures(html).and_then(|c| c.get(1)) else {
        return DEFAULT_PDF_FILENAME.to_string();
    };

    let decoded = decode_basic_entities(title.as_str());
    let stem = decoded
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let stem = stem.trim_matches(|c: char| matches!(c, '-' | '_' | '.'));

    if !stem.chars().any(char::is_alphanumeric) {
        return DEFAULT_PDF_FILENAME.to_string();
    }

    format!("{stem}.pdf")
}

fn decode_basic_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
