//! Search orchestrator: concurrent queries, ordered merge, selection.
//!
//! This module fans out catalog queries concurrently, joins every outcome,
//! folds the envelopes in query order while dropping column-less and
//! duplicate results, and narrows merged lists to selected ids.

pub mod merge;
pub mod search;
pub mod select;
