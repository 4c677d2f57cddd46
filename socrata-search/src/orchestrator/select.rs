//! Narrow a merged result list to an externally chosen set of ids.

use std::collections::HashSet;

use crate::types::SearchResult;

/// Keep only results whose resource id is in `selected`, preserving the
/// order of `results` (not the iteration order of the set).
pub fn find_datasets(results: &[SearchResult], selected: &HashSet<String>) -> Vec<SearchResult> {
    results
        .iter()
        .filter(|result| selected.contains(result.id()))
        .cloned()
        .collect()
}
