//! Configuration for the explorer, loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use socrata_search::{FailurePolicy, SearchConfig, DEFAULT_BASE_URL};

use crate::error::{ExplorerError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Catalog search settings.
    pub catalog: CatalogConfig,
}

/// Catalog endpoint and batch behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog search endpoint.
    pub base_url: String,
    /// Per-query timeout in seconds.
    pub timeout_seconds: u64,
    /// Cap on concurrent requests; unset means no cap.
    pub max_concurrency: Option<usize>,
    /// `isolate` keeps partial results, `fail_fast` aborts on any failure.
    pub failure_policy: FailurePolicy,
    /// Custom User-Agent header.
    pub user_agent: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_seconds: search.timeout_seconds,
            max_concurrency: search.max_concurrency,
            failure_policy: search.failure_policy,
            user_agent: search.user_agent,
        }
    }
}

impl CatalogConfig {
    /// Convert into the search crate's configuration.
    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig {
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout_seconds,
            max_concurrency: self.max_concurrency,
            failure_policy: self.failure_policy,
            user_agent: self.user_agent.clone(),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ExplorerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ExplorerError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the catalog settings.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.catalog
            .to_search_config()
            .validate()
            .map_err(|e| ExplorerError::Config(e.to_string()))
    }

    /// Returns the default config file path: `~/.config/open-data-explorer/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config)
                .join("open-data-explorer")
                .join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("open-data-explorer")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/open-data-explorer/config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ExplorerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.catalog.failure_policy, FailurePolicy::Isolate);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let config = ExplorerConfig {
            catalog: CatalogConfig {
                base_url: "http://localhost:8080/api/catalog/v1".into(),
                timeout_seconds: 3,
                max_concurrency: Some(4),
                failure_policy: FailurePolicy::FailFast,
                user_agent: Some("ExplorerTest/1.0".into()),
            },
        };
        config.save_to_file(&path).expect("save");
        let loaded = ExplorerConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let config: ExplorerConfig = toml::from_str(
            r#"
            [catalog]
            failure_policy = "fail_fast"
            "#,
        )
        .expect("parse");
        assert_eq!(config.catalog.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.catalog.timeout_seconds, 10);
    }

    #[test]
    fn empty_file_is_default() {
        let config: ExplorerConfig = toml::from_str("").expect("parse");
        assert_eq!(config, ExplorerConfig::default());
    }

    #[test]
    fn invalid_values_rejected_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog]\ntimeout_seconds = 0\n").expect("write");
        let err = ExplorerConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn unknown_policy_rejected() {
        let result: std::result::Result<ExplorerConfig, _> =
            toml::from_str("[catalog]\nfailure_policy = \"retry\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ExplorerConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ExplorerError::Io(_)));
    }

    #[test]
    fn converts_to_search_config() {
        let catalog = CatalogConfig {
            max_concurrency: Some(2),
            ..Default::default()
        };
        let search = catalog.to_search_config();
        assert_eq!(search.max_concurrency, Some(2));
        assert_eq!(search.base_url, DEFAULT_BASE_URL);
    }
}
