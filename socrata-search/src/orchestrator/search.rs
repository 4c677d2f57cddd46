//! Core search orchestrator: concurrent fan-out, join, ordered merge.
//!
//! Every query is dispatched concurrently against one [`CatalogSource`].
//! Each outcome is tagged with the index of its query, all outcomes are
//! joined, and only then does a single-threaded fold merge the envelopes
//! in query order. No state is shared between the fetch tasks.

use std::time::Duration;

use futures::StreamExt;

use crate::catalog::CatalogSource;
use crate::config::{FailurePolicy, SearchConfig};
use crate::error::SearchError;
use crate::types::{SearchApiResponse, SearchResult};

use super::merge::ResultMerger;

/// A query that produced no envelope, with the reason.
#[derive(Debug)]
pub struct QueryFailure {
    pub query: String,
    pub error: SearchError,
}

/// Outcome of a search batch under [`FailurePolicy::Isolate`].
#[derive(Debug, Default)]
pub struct SearchReport {
    /// Merged, quality-filtered, deduplicated results in first-seen order.
    pub results: Vec<SearchResult>,
    /// Queries that failed, in query order.
    pub failures: Vec<QueryFailure>,
}

impl SearchReport {
    /// Whether every query contributed an envelope.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs query batches against a catalog source.
///
/// Stateless between calls apart from its source and configuration.
#[derive(Debug, Clone)]
pub struct Searcher<C> {
    source: C,
    config: SearchConfig,
}

impl<C: CatalogSource> Searcher<C> {
    pub fn new(source: C, config: SearchConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search all `queries` and return the merged results.
    ///
    /// # Errors
    ///
    /// See [`Searcher::search_with_report`]. Under [`FailurePolicy::Isolate`]
    /// per-query failures are logged and dropped from the return value.
    pub async fn search<S>(&self, queries: &[S]) -> Result<Vec<SearchResult>, SearchError>
    where
        S: AsRef<str> + Sync,
    {
        self.search_with_report(queries).await.map(|report| report.results)
    }

    /// Search all `queries` and return merged results plus per-query failures.
    ///
    /// # Pipeline
    ///
    /// 1. Fan out one fetch per query, each bounded by `timeout_seconds`
    /// 2. Join every fetch before merging
    /// 3. Restore query order from the per-outcome index
    /// 4. Apply the failure policy
    /// 5. Fold envelopes in query order through [`ResultMerger`]
    ///
    /// # Errors
    ///
    /// - [`SearchError::Config`] if the configuration is invalid; nothing is
    ///   dispatched.
    /// - [`FailurePolicy::FailFast`]: [`SearchError::QueryFailed`] for the
    ///   first failing query in input order.
    /// - [`FailurePolicy::Isolate`]: [`SearchError::AllQueriesFailed`] only
    ///   if no query produced an envelope.
    pub async fn search_with_report<S>(&self, queries: &[S]) -> Result<SearchReport, SearchError>
    where
        S: AsRef<str> + Sync,
    {
        self.config.validate()?;
        if queries.is_empty() {
            return Ok(SearchReport::default());
        }

        let outcomes = fetch_all(&self.source, queries, &self.config).await;

        let mut envelopes: Vec<SearchApiResponse> = Vec::with_capacity(outcomes.len());
        let mut failures: Vec<QueryFailure> = Vec::new();

        for (index, outcome) in outcomes {
            let query = queries[index].as_ref();
            match outcome {
                Ok(envelope) => {
                    tracing::debug!(index, count = envelope.results.len(), "query returned results");
                    envelopes.push(envelope);
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::FailFast => {
                        tracing::warn!(index, error = %error, "query failed, aborting batch");
                        return Err(SearchError::QueryFailed {
                            query: query.to_owned(),
                            source: Box::new(error),
                        });
                    }
                    FailurePolicy::Isolate => {
                        tracing::warn!(index, error = %error, "query failed");
                        failures.push(QueryFailure {
                            query: query.to_owned(),
                            error,
                        });
                    }
                },
            }
        }

        if envelopes.is_empty() {
            let summary = failures
                .iter()
                .map(|f| format!("{}: {}", f.query, f.error))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SearchError::AllQueriesFailed(summary));
        }

        let mut merger = ResultMerger::new();
        for envelope in envelopes {
            merger.push_envelope(envelope);
        }
        tracing::debug!(
            without_columns = merger.dropped_without_columns(),
            duplicates = merger.dropped_duplicates(),
            failed = failures.len(),
            "merged query results"
        );

        Ok(SearchReport {
            results: merger.finish(),
            failures,
        })
    }
}

/// Fetch every query concurrently and return outcomes sorted by query index.
///
/// With `max_concurrency` unset all fetches start together; otherwise at most
/// that many are in flight. Completion order never leaks into the output.
async fn fetch_all<C, S>(
    source: &C,
    queries: &[S],
    config: &SearchConfig,
) -> Vec<(usize, Result<SearchApiResponse, SearchError>)>
where
    C: CatalogSource,
    S: AsRef<str> + Sync,
{
    let timeout = Duration::from_secs(config.timeout_seconds);

    let tasks = queries.iter().enumerate().map(|(index, query)| async move {
        let outcome = match tokio::time::timeout(timeout, source.fetch(query.as_ref())).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(format!(
                "no response within {}s",
                timeout.as_secs()
            ))),
        };
        (index, outcome)
    });

    let mut outcomes: Vec<_> = match config.max_concurrency {
        Some(limit) => {
            futures::stream::iter(tasks)
                .buffer_unordered(limit)
                .collect::<Vec<_>>()
                .await
        }
        None => futures::future::join_all(tasks).await,
    };
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes
}
