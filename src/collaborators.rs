//! Seams for the language-model collaborators around catalog search.
//!
//! Query generation turns a user's question into catalog queries; dataset
//! selection picks resource ids out of the merged candidates. Prompting and
//! model access live with the implementor.

use std::collections::HashSet;
use std::future::Future;

use socrata_search::SearchResult;

use crate::error::Result;

/// Produces catalog search queries for a user's question.
pub trait QueryGenerator: Send + Sync {
    /// # Errors
    ///
    /// Implementations return [`crate::ExplorerError::Generation`] (or a
    /// response parse error) when no queries can be produced.
    fn generate_queries(&self, user_query: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Chooses which candidate datasets answer a user's question.
pub trait DatasetSelector: Send + Sync {
    /// Return the resource ids of the chosen candidates.
    ///
    /// # Errors
    ///
    /// Implementations return [`crate::ExplorerError::Selection`] (or a
    /// response parse error) when selection fails.
    fn select_datasets(
        &self,
        user_query: &str,
        candidates: &[SearchResult],
    ) -> impl Future<Output = Result<HashSet<String>>> + Send;
}

/// Generator that ignores the question and returns a fixed query list.
///
/// Used when queries are supplied directly, e.g. on the command line.
#[derive(Debug, Clone, Default)]
pub struct FixedQueries(pub Vec<String>);

impl QueryGenerator for FixedQueries {
    async fn generate_queries(&self, _user_query: &str) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Selector that keeps every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAll;

impl DatasetSelector for SelectAll {
    async fn select_datasets(
        &self,
        _user_query: &str,
        candidates: &[SearchResult],
    ) -> Result<HashSet<String>> {
        Ok(candidates.iter().map(|c| c.id().to_owned()).collect())
    }
}

/// Selector with a fixed id set.
#[derive(Debug, Clone, Default)]
pub struct SelectIds(pub HashSet<String>);

impl DatasetSelector for SelectIds {
    async fn select_datasets(
        &self,
        _user_query: &str,
        _candidates: &[SearchResult],
    ) -> Result<HashSet<String>> {
        Ok(self.0.clone())
    }
}
