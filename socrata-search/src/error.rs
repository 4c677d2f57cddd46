//! Error types for the socrata-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Schema failures carry the path of the
//! offending field so upstream drift can be located quickly.

use std::fmt;

/// A catalog response that did not match the expected envelope schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the field that failed, e.g. `results[0].resource.id`.
    /// Empty when the failure is at the document root (e.g. not JSON at all).
    pub path: String,
    /// Underlying deserializer message.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() || self.path == "." {
            write!(f, "at document root: {}", self.message)
        } else {
            write!(f, "at `{}`: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors that can occur during catalog search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to the catalog failed or returned a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A single query did not complete within the configured timeout.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// The response body did not match the envelope schema.
    #[error("validation error {0}")]
    Validation(#[from] ValidationError),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Fail-fast policy: the first failing query (in input order) aborted the batch.
    #[error("query \"{query}\" failed: {source}")]
    QueryFailed {
        query: String,
        #[source]
        source: Box<SearchError>,
    },

    /// Isolating policy: every dispatched query failed.
    #[error("all queries failed: {0}")]
    AllQueriesFailed(String),
}

/// Convenience type alias for socrata-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
