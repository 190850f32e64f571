use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::translate::DEFAULT_ENDPOINT;

pub const CONFIG_FILE: &str = "config.yaml";

/// Environment variable that overrides `translation.api_key`.
pub const API_KEY_ENV: &str = "NOTEBOARD_API_KEY";

/// Project configuration, read from `.noteboard/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translation: TranslationConfig,
}

/// Settings for the translation client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// URL of the `translate_a/single` endpoint
    pub endpoint: String,
    /// Quiet period before an edited text is sent, in milliseconds (500-1000)
    pub debounce_ms: u64,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Optional key appended to every request
    pub api_key: Option<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            debounce_ms: 500,
            timeout_secs: 10,
            api_key: None,
        }
    }
}

impl Config {
    /// Load `config.yaml` from `dir`. A missing file means defaults; the API
    /// key environment variable wins over the file.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            debug!(path = %path.display(), "reading config");
            Self::from_yaml(&fs::read_to_string(&path)?)?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.translation.set_api_key(&key);
        }
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

impl TranslationConfig {
    /// Store `raw` as the API key after stripping quotes and whitespace. An
    /// empty result clears the key.
    pub fn set_api_key(&mut self, raw: &str) {
        let cleaned: String = raw.chars().filter(|c| *c != '"' && *c != '\'').collect();
        let cleaned = cleaned.trim();
        self.api_key = if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.translation.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.translation.debounce_ms, 500);
        assert!(config.translation.api_key.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("translation:\n  debounce_ms: 800\n").unwrap();
        assert_eq!(config.translation.debounce_ms, 800);
        assert_eq!(config.translation.timeout_secs, 10);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Config::from_yaml("translation: [1, 2").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.translation.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_api_key_is_cleaned() {
        let mut translation = TranslationConfig::default();
        translation.set_api_key(" \"abc123\" ");
        assert_eq!(translation.api_key.as_deref(), Some("abc123"));
        translation.set_api_key("''");
        assert!(translation.api_key.is_none());
    }
}
