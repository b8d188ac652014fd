//! Settings for the AI-assisted parser.
//!
//! Built once by the binary and handed down by value. Nothing below the
//! binary reads the process environment.

use serde::Deserialize;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings.normalized())
    }

    /// Overlay environment values on top of `self`.
    ///
    /// - `OPENAI_API_KEY`
    /// - `SHAPESKETCH_OPENAI_MODEL`
    /// - `SHAPESKETCH_OPENAI_BASE_URL`
    /// - `SHAPESKETCH_TIMEOUT_SECS`
    ///
    /// `lookup` is usually `|key| std::env::var(key).ok()`.
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(model) = lookup("SHAPESKETCH_OPENAI_MODEL") {
            self.openai_model = model;
        }
        if let Some(url) = lookup("SHAPESKETCH_OPENAI_BASE_URL") {
            self.openai_base_url = url;
        }
        if let Some(raw) = lookup("SHAPESKETCH_TIMEOUT_SECS") {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "SHAPESKETCH_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
        }
        Ok(self.normalized())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_lookup(lookup)
    }

    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    fn normalized(mut self) -> Self {
        self.openai_base_url = self.openai_base_url.trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_key(), None);
    }

    #[test]
    fn env_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SHAPESKETCH_OPENAI_MODEL", "gpt-4o"),
            ("SHAPESKETCH_OPENAI_BASE_URL", "https://example.test/v1/"),
            ("SHAPESKETCH_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(settings.api_key(), Some("sk-test"));
        assert_eq!(settings.openai_model, "gpt-4o");
        assert_eq!(settings.openai_base_url, "https://example.test/v1");
        assert_eq!(settings.request_timeout_secs, 5);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("SHAPESKETCH_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "SHAPESKETCH_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let settings = Settings::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert_eq!(settings.api_key(), None);
    }

    #[test]
    fn toml_then_env() {
        let file = Settings::from_toml("openai_model = \"gpt-4.1-mini\"\nrequest_timeout_secs = 12\n")
            .unwrap();
        assert_eq!(file.openai_model, "gpt-4.1-mini");
        assert_eq!(file.openai_base_url, DEFAULT_OPENAI_BASE_URL);

        let merged = file.with_lookup(lookup(&[("OPENAI_API_KEY", "sk-file")])).unwrap();
        assert_eq!(merged.request_timeout_secs, 12);
        assert_eq!(merged.api_key(), Some("sk-file"));
    }
}
