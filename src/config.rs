//! Configuration file loading
//! Reads `config.json` from the user config directory; a missing file means defaults.

use crate::cache::FRESHNESS_WINDOW;
use crate::fallback::FallbackOptions;
use crate::resolver::ResolveOptions;
use crate::sources::{default_sources, FlagSource};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const APP_NAME: &str = "flagmap";
const CONFIG_FILENAME: &str = "config.json";

/// Errors while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub resolve: ResolveOptions,
    pub fallback: FallbackOptions,
    /// Replaces the built-in source list when non-empty
    pub sources: Vec<FlagSource>,
    /// Freshness window override in seconds
    pub cache_ttl_secs: Option<u64>,
}

impl AppConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads from `path`, falling back to defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path()?)
    }

    /// Sources to probe: the configured list, or the built-in one
    pub fn sources(&self) -> Vec<FlagSource> {
        if self.sources.is_empty() {
            default_sources()
        } else {
            self.sources.clone()
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(FRESHNESS_WINDOW)
    }
}

/// Gets the config directory path
fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Full path to the default config file
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::Theme;
    use crate::sources::CheckKind;

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.resolve, ResolveOptions::default());
        assert_eq!(config.fallback, FallbackOptions::default());
        assert_eq!(config.sources(), default_sources());
        assert_eq!(config.cache_ttl(), FRESHNESS_WINDOW);
    }

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_json(
            r#"{
                "resolve": { "maxRetries": 1, "timeout": 250, "fallbackToLowerQuality": false },
                "fallback": { "theme": "dark", "showCode": false },
                "sources": [
                    { "name": "mirror", "priority": 1, "urlTemplate": "https://mirror/{code}.png", "check": "head" }
                ],
                "cacheTtlSecs": 600
            }"#,
        )
        .unwrap();

        assert_eq!(config.resolve.max_retries, 1);
        assert_eq!(config.resolve.timeout, Duration::from_millis(250));
        assert_eq!(config.resolve.prefer_format, "png");
        assert!(!config.resolve.fallback_to_lower_quality);
        assert_eq!(config.fallback.theme, Theme::Dark);
        assert!(!config.fallback.show_code);
        assert_eq!(config.sources().len(), 1);
        assert_eq!(config.sources()[0].check, CheckKind::Head);
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_invalid_json() {
        let result = AppConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("flagmap-test-missing").join(CONFIG_FILENAME);
        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.sources.is_empty());
    }
}
