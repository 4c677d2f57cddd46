//! Catalog backends that turn one query string into one response envelope.
//!
//! [`HttpCatalog`] talks to the real catalog API. The orchestrator is generic
//! over [`CatalogSource`] so alternative transports can be plugged in.

use reqwest::header::ACCEPT;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::{build_client, classify_reqwest_error};
use crate::query_url::build_query_url;
use crate::types::SearchApiResponse;

/// A source of catalog search envelopes.
///
/// Implementors handle their own:
///
/// - URL construction with query encoding
/// - transport and status handling
/// - decoding of the body into a [`SearchApiResponse`]
///
/// All implementations must be `Send + Sync` so one source can serve every
/// query of a batch concurrently.
pub trait CatalogSource: Send + Sync {
    /// Fetch and parse the first page of results for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, the catalog answers with
    /// a non-success status, or the body does not match the envelope schema.
    fn fetch(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<SearchApiResponse, SearchError>> + Send;
}

/// Catalog API client issuing `GET {base_url}?q={query}` requests.
///
/// Clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    /// Build a catalog client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self::with_client(build_client(config)?, &config.base_url))
    }

    /// Wrap an existing client, e.g. one shared with other components.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// The endpoint queries are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl CatalogSource for HttpCatalog {
    async fn fetch(&self, query: &str) -> Result<SearchApiResponse, SearchError> {
        tracing::trace!(query, "catalog search");

        let url = build_query_url(&self.base_url, query);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify_reqwest_error)?
            .error_for_status()
            .map_err(classify_reqwest_error)?;

        let body = response.text().await.map_err(classify_reqwest_error)?;
        tracing::trace!(bytes = body.len(), "catalog response received");

        let envelope = SearchApiResponse::from_json(&body)?;
        tracing::debug!(
            count = envelope.results.len(),
            result_set_size = envelope.result_set_size,
            "catalog envelope parsed"
        );
        Ok(envelope)
    }
}
