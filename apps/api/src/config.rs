use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_LLM_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub llm_api_base: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_attempts: u32,
    /// Overrides the built-in CV template when set.
    pub template_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            gemini_api_key: require("GEMINI_API_KEY")?,
            llm_api_base: lookup("LLM_API_BASE").unwrap_or_else(|| DEFAULT_LLM_API_BASE.to_string()),
            llm_model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts: parse_or(&lookup, "LLM_MAX_ATTEMPTS", 1)?,
            template_path: lookup("CV_TEMPLATE_PATH").map(PathBuf::from),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| (key == "GEMINI_API_KEY").then(|| "test-key".to_string()))
            .expect("test config is valid")
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.llm_model, "gemini-2.0-flash");
        assert_eq!(config.llm_timeout_secs, 120);
        assert_eq!(config.llm_max_attempts, 1);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.template_path.is_none());
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("LLM_MODEL", "gemini-1.5-pro"),
            ("LLM_MAX_ATTEMPTS", "3"),
            ("CV_TEMPLATE_PATH", "/srv/cv.html"),
            ("PORT", "3000"),
        ]))
        .unwrap();
        assert_eq!(config.llm_model, "gemini-1.5-pro");
        assert_eq!(config.llm_max_attempts, 3);
        assert_eq!(config.template_path, Some(PathBuf::from("/srv/cv.html")));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k"), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
