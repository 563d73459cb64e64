//! Engine configuration - corpus location, thresholds, and fallbacks.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::categories::ResponseSelection;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type error.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax or type error.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the dialogue engine.
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory scanned for corpus files.
    pub corpus_path: PathBuf,

    /// Reply used when nothing in the corpus matches.
    pub default_response: String,

    /// Minimum similarity score (0-100) for the fuzzy fallback.
    pub match_threshold: u32,

    /// Inputs longer than this many bytes skip matching entirely.
    pub max_input_length: usize,

    /// How a template is picked from a plain category.
    pub response_selection: ResponseSelection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("./corpus"),
            default_response: "Sorry, I didn't understand that.".to_string(),
            match_threshold: 70,
            max_input_length: 10_000,
            response_selection: ResponseSelection::Random,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a config file. `.json` files are parsed as JSON, everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.corpus_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("corpus_path must not be empty".into()));
        }
        if self.default_response.is_empty() {
            return Err(ConfigError::Invalid("default_response must not be empty".into()));
        }
        if self.match_threshold > 100 {
            return Err(ConfigError::Invalid(format!(
                "match_threshold must be within 0..=100, got {}",
                self.match_threshold
            )));
        }
        Ok(())
    }

    /// Set the corpus directory.
    pub fn with_corpus_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_path = path.into();
        self
    }

    /// Set the similarity threshold.
    pub fn with_match_threshold(mut self, threshold: u32) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// Set the template selection policy.
    pub fn with_response_selection(mut self, selection: ResponseSelection) -> Self {
        self.response_selection = selection;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.match_threshold, 70);
        assert_eq!(config.corpus_path, PathBuf::from("./corpus"));
        assert_eq!(config.response_selection, ResponseSelection::Random);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            corpus_path = "data/corpus"
            match_threshold = 85
            response_selection = "first"
            "#,
        )
        .unwrap();

        assert_eq!(config.corpus_path, PathBuf::from("data/corpus"));
        assert_eq!(config.match_threshold, 85);
        assert_eq!(config.response_selection, ResponseSelection::First);
        assert_eq!(config.default_response, EngineConfig::default().default_response);
    }

    #[test]
    fn test_zero_threshold_is_kept() {
        let config = EngineConfig::from_toml_str("match_threshold = 0").unwrap();
        assert_eq!(config.match_threshold, 0);
    }

    #[test]
    fn test_json_config() {
        let config =
            EngineConfig::from_json_str(r#"{"default_response": "Come again?"}"#).unwrap();
        assert_eq!(config.default_response, "Come again?");
        assert_eq!(config.match_threshold, 70);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = EngineConfig::default().with_match_threshold(101);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = EngineConfig {
            default_response: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig::default().with_corpus_path("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("engine.toml");
        std::fs::write(&toml_path, "match_threshold = 60\n").unwrap();
        assert_eq!(EngineConfig::load(&toml_path).unwrap().match_threshold, 60);

        let json_path = dir.path().join("engine.json");
        std::fs::write(&json_path, r#"{"match_threshold": 55}"#).unwrap();
        assert_eq!(EngineConfig::load(&json_path).unwrap().match_threshold, 55);
    }

    #[test]
    fn test_load_missing_file() {
        let result = EngineConfig::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "match_threshold = [").unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Toml(_))));
    }
}
