//! Ordered merge of per-query result sets.
//!
//! Results are folded in query order, then in each envelope's own order.
//! A result is accepted only if its resource describes at least one column
//! and its resource id has not been accepted before. The first occurrence
//! wins; later duplicates are dropped without reconciliation.

use std::collections::HashSet;

use crate::types::{SearchApiResponse, SearchResult};

/// Single-threaded accumulator for the merge step.
#[derive(Debug, Default)]
pub struct ResultMerger {
    seen: HashSet<String>,
    results: Vec<SearchResult>,
    dropped_without_columns: usize,
    dropped_duplicates: usize,
}

impl ResultMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one result. Returns `true` if it was accepted.
    pub fn push(&mut self, result: SearchResult) -> bool {
        if !result.resource.has_columns() {
            self.dropped_without_columns += 1;
            return false;
        }
        if !self.seen.insert(result.resource.id.clone()) {
            self.dropped_duplicates += 1;
            return false;
        }
        self.results.push(result);
        true
    }

    /// Offer every result of an envelope, in envelope order.
    pub fn push_envelope(&mut self, envelope: SearchApiResponse) {
        for result in envelope.results {
            self.push(result);
        }
    }

    /// Results dropped because their resource has no columns.
    pub fn dropped_without_columns(&self) -> usize {
        self.dropped_without_columns
    }

    /// Results dropped because their id was already accepted.
    pub fn dropped_duplicates(&self) -> usize {
        self.dropped_duplicates
    }

    /// Accepted results in first-seen order.
    pub fn finish(self) -> Vec<SearchResult> {
        self.results
    }
}

/// Merge envelopes supplied in query order into one filtered, deduplicated list.
pub fn merge_envelopes<I>(envelopes: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = SearchApiResponse>,
{
    let mut merger = ResultMerger::new();
    for envelope in envelopes {
        merger.push_envelope(envelope);
    }
    merger.finish()
}
