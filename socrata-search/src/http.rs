//! Shared HTTP client for catalog requests.
//!
//! One [`reqwest::Client`] is built per search batch so that every query in
//! the batch reuses the same connection pool. Nothing is retained between
//! batches.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// User-Agent sent when the configuration does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("socrata-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] configured for catalog API requests.
///
/// The client has:
/// - Timeout from config (applied per request)
/// - Custom User-Agent if configured, otherwise [`DEFAULT_USER_AGENT`]
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Map a transport error onto the crate's error taxonomy.
pub(crate) fn classify_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(format!("catalog request timed out: {err}"))
    } else if let Some(status) = err.status() {
        SearchError::Http(format!("catalog returned {status}"))
    } else {
        SearchError::Http(format!("catalog request failed: {err}"))
    }
}
