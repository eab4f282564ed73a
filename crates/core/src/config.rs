use std::env;
use crate::error::{AppError, Result};
use dotenvy::dotenv;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Endpoint root used when `GEMINI_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: String,
    pub model_name: String,
    pub base_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// `GEMINI_API_KEY` wins over the older `API_KEY` name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let model_name = lookup("GEMINI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup("GEMINI_BASE_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            gemini_api_key: api_key,
            model_name,
            base_url,
        })
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.gemini_api_key, "k");
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_legacy_api_key_fallback() {
        let config = Config::from_lookup(lookup_from(&[("API_KEY", "legacy")])).unwrap();
        assert_eq!(config.gemini_api_key, "legacy");

        let config = Config::from_lookup(lookup_from(&[
            ("API_KEY", "legacy"),
            ("GEMINI_API_KEY", "primary"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_api_key, "primary");
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_MODEL", "x")])).unwrap_err();
        assert!(matches!(err, AppError::MissingEnvVar(_)));

        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::MissingEnvVar(_)));
    }

    #[test]
    fn test_model_override() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "nano-banana-pro-preview"),
        ]))
        .unwrap();
        assert_eq!(config.model_name, "nano-banana-pro-preview");
    }
}
