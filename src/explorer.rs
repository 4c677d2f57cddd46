//! The explore pipeline: question → queries → merged candidates → selection.

use socrata_search::{find_datasets, search_with_report, QueryFailure, SearchConfig, SearchResult};

use crate::collaborators::{DatasetSelector, QueryGenerator};
use crate::error::Result;
use crate::structured::normalize_queries;

/// Everything one exploration produced.
#[derive(Debug, Default)]
pub struct Exploration {
    /// Queries the generator proposed, as dispatched.
    pub queries: Vec<String>,
    /// Merged search results offered to the selector.
    pub candidates: Vec<SearchResult>,
    /// Queries that failed under the isolating failure policy.
    pub failures: Vec<QueryFailure>,
    /// Candidates the selector chose, in candidate order.
    pub selected: Vec<SearchResult>,
}

/// Wires a query generator and a dataset selector around catalog search.
#[derive(Debug, Clone)]
pub struct Explorer<G, S> {
    generator: G,
    selector: S,
    search: SearchConfig,
}

impl<G: QueryGenerator, S: DatasetSelector> Explorer<G, S> {
    pub fn new(generator: G, selector: S, search: SearchConfig) -> Self {
        Self {
            generator,
            selector,
            search,
        }
    }

    /// Run one exploration for `user_query`.
    ///
    /// Generated queries are trimmed and blank or repeated ones dropped
    /// before dispatch. The selector is not consulted when the search
    /// produced no candidates.
    ///
    /// # Errors
    ///
    /// Propagates generator, search, and selector failures.
    pub async fn explore(&self, user_query: &str) -> Result<Exploration> {
        let generated = self.generator.generate_queries(user_query).await?;
        let proposed = generated.len();
        let queries = normalize_queries(generated);
        tracing::info!(
            queries = queries.len(),
            dropped = proposed - queries.len(),
            "generated catalog queries"
        );

        let report = search_with_report(&queries, &self.search).await?;
        tracing::info!(
            candidates = report.results.len(),
            failed = report.failures.len(),
            "catalog search finished"
        );

        if report.results.is_empty() {
            return Ok(Exploration {
                queries,
                candidates: Vec::new(),
                failures: report.failures,
                selected: Vec::new(),
            });
        }

        let chosen = self
            .selector
            .select_datasets(user_query, &report.results)
            .await?;
        let selected = find_datasets(&report.results, &chosen);
        if selected.len() < chosen.len() {
            tracing::warn!(
                chosen = chosen.len(),
                matched = selected.len(),
                "selector returned ids that are not among the candidates"
            );
        }

        Ok(Exploration {
            queries,
            candidates: report.results,
            failures: report.failures,
            selected,
        })
    }
}
