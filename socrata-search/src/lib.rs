//! # socrata-search
//!
//! Concurrent multi-query search against a Socrata-style catalog API.
//!
//! Given a list of query strings, this crate issues one catalog request per
//! query concurrently, parses every response into a typed envelope, and
//! merges the per-query results into a single list.
//!
//! ## Design
//!
//! - One shared HTTP client per batch, nothing retained between batches
//! - Fork-join: every fetch completes (or fails, or times out) before merging
//! - Merge order follows query order, never network completion order
//! - Results without columns are dropped; the first occurrence of each
//!   resource id wins
//! - Graceful degradation by default: failed queries are reported alongside
//!   the results of the queries that succeeded
//!
//! ## Logging
//!
//! Query text is logged only at trace level.

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod query_url;
pub mod types;

pub use catalog::{CatalogSource, HttpCatalog};
pub use config::{FailurePolicy, SearchConfig, DEFAULT_BASE_URL};
pub use error::{Result, SearchError, ValidationError};
pub use orchestrator::merge::merge_envelopes;
pub use orchestrator::search::{QueryFailure, SearchReport, Searcher};
pub use orchestrator::select::find_datasets;
pub use types::{
    Classification, Column, Metadata, PageViews, Resource, SearchApiResponse, SearchResult,
    Timings, User,
};

/// Search the catalog for every query concurrently and merge the results.
///
/// Results are ordered by first appearance across `queries` in input order.
/// Results whose resource has no columns are dropped, as are repeats of a
/// resource id already returned.
///
/// An empty `queries` slice returns an empty list without any network call.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid `config`. Otherwise see
/// [`search_with_report`]; under [`FailurePolicy::Isolate`] individual query
/// failures are logged and omitted.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> socrata_search::Result<()> {
/// let config = socrata_search::SearchConfig::default();
/// let results = socrata_search::get_search_results(&["parks", "recreation"], &config).await?;
/// for result in &results {
///     println!("{}: {}", result.resource.id, result.resource.name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn get_search_results<S>(queries: &[S], config: &SearchConfig) -> Result<Vec<SearchResult>>
where
    S: AsRef<str> + Sync,
{
    search_with_report(queries, config)
        .await
        .map(|report| report.results)
}

/// Like [`get_search_results`], but also returns the per-query failures.
///
/// # Errors
///
/// - [`SearchError::Config`] if `config` fails validation.
/// - [`SearchError::QueryFailed`] under [`FailurePolicy::FailFast`] when any
///   query fails; the first failing query in input order is named.
/// - [`SearchError::AllQueriesFailed`] under [`FailurePolicy::Isolate`] when
///   no query succeeded.
pub async fn search_with_report<S>(queries: &[S], config: &SearchConfig) -> Result<SearchReport>
where
    S: AsRef<str> + Sync,
{
    config.validate()?;
    if queries.is_empty() {
        return Ok(SearchReport::default());
    }
    let catalog = HttpCatalog::new(config)?;
    Searcher::new(catalog, config.clone())
        .search_with_report(queries)
        .await
}
