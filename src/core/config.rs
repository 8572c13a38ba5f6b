use crate::core::messages::Locale;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OpenErApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub open_er_api: Option<OpenErApiConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            open_er_api: Some(OpenErApiConfig {
                base_url: DEFAULT_RATES_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Seconds after which an unanswered amount prompt is forgotten.
    pub session_ttl_secs: Option<u64>,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "ratebot", "ratebot")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn rates_base_url(&self) -> &str {
        self.providers
            .open_er_api
            .as_ref()
            .map_or(DEFAULT_RATES_URL, |p| &p.base_url)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
locale: en
providers:
  open_er_api:
    base_url: "http://example.com/rates"
session_ttl_secs: 300
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.rates_base_url(), "http://example.com/rates");
        assert_eq!(config.session_ttl(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.locale, Locale::Ru);
        assert_eq!(config.rates_base_url(), DEFAULT_RATES_URL);
        assert!(config.session_ttl().is_none());
    }

    #[test]
    fn test_config_without_provider_entry() {
        let yaml_str = r#"
providers:
  open_er_api: ~
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.rates_base_url(), DEFAULT_RATES_URL);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/ratebot/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
