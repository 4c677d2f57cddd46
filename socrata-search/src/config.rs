//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the catalog endpoint, per-query timeouts,
//! concurrency and how a failing query affects the rest of the batch.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SearchError;

/// Public Socrata Discovery API catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.us.socrata.com/api/catalog/v1";

/// What a single failing query does to the batch it belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure, keep results from the other queries. The batch
    /// fails only when every query fails.
    #[default]
    Isolate,
    /// Abort the whole batch on the first failing query in input order.
    FailFast,
}

/// Configuration for a catalog search batch.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Catalog search endpoint. Each query is sent as `{base_url}?q={query}`.
    pub base_url: String,
    /// Per-query timeout in seconds, covering connect, response and body.
    pub timeout_seconds: u64,
    /// Upper bound on in-flight requests. `None` dispatches every query at once.
    pub max_concurrency: Option<usize>,
    /// Batch behaviour when an individual query fails.
    pub failure_policy: FailurePolicy,
    /// Custom User-Agent string. If `None`, a crate-identifying default is sent.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_seconds: 10,
            max_concurrency: None,
            failure_policy: FailurePolicy::Isolate,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `base_url` must parse as an absolute `http` or `https` URL
    /// - `timeout_seconds` must be greater than 0
    /// - `max_concurrency`, when set, must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("base_url is not a valid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "base_url must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_concurrency == Some(0) {
            return Err(SearchError::Config(
                "max_concurrency must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.max_concurrency.is_none());
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = SearchConfig {
            max_concurrency: Some(0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrency"));
    }

    #[test]
    fn unparseable_base_url_rejected() {
        let config = SearchConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn non_http_scheme_rejected() {
        let config = SearchConfig {
            base_url: "ftp://catalog.example.com/v1".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn local_http_base_url_valid() {
        let config = SearchConfig {
            base_url: "http://127.0.0.1:8080/api/catalog/v1".into(),
            max_concurrency: Some(4),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn failure_policy_serde_snake_case() {
        let json = serde_json::to_string(&FailurePolicy::FailFast).expect("serialize");
        assert_eq!(json, "\"fail_fast\"");
        let decoded: FailurePolicy = serde_json::from_str("\"isolate\"").expect("deserialize");
        assert_eq!(decoded, FailurePolicy::Isolate);
    }
}
