//! Error types for the explorer pipeline.

use socrata_search::SearchError;

/// Top-level error type for the open data explorer.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// Catalog search failed.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// The query generator could not produce search queries.
    #[error("query generation error: {0}")]
    Generation(String),

    /// The dataset selector could not choose among the candidates.
    #[error("selection error: {0}")]
    Selection(String),

    /// A structured model response could not be parsed.
    #[error("response parse error: {0}")]
    Response(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_convert() {
        let err: ExplorerError = SearchError::Timeout("no response within 10s".into()).into();
        assert_eq!(
            err.to_string(),
            "search error: search timed out: no response within 10s"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: ExplorerError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml").into();
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExplorerError>();
    }
}
