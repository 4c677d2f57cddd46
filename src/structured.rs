//! Structured responses exchanged with the language-model collaborators.
//!
//! The query generator answers with a [`SearchQueries`] object and the
//! dataset selector with a [`DatasetSelection`] object. Model output often
//! arrives wrapped in markdown fences or surrounded by prose, so parsing
//! first isolates the JSON body and then deserializes it strictly.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};

/// Catalog queries proposed for a user's question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQueries {
    pub search_queries: Vec<String>,
}

impl SearchQueries {
    /// Parse a raw model response.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::Response`] if no valid object can be found.
    pub fn from_response(raw: &str) -> Result<Self> {
        parse_structured_response(raw)
    }

    /// Queries with surrounding whitespace removed, blanks and exact repeats dropped.
    pub fn into_queries(self) -> Vec<String> {
        normalize_queries(self.search_queries)
    }
}

/// Trim every query and drop blanks and exact repeats, keeping first-seen order.
pub fn normalize_queries(queries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    queries
        .into_iter()
        .map(|q| q.trim().to_owned())
        .filter(|q| !q.is_empty() && seen.insert(q.clone()))
        .collect()
}

/// Resource ids chosen from a candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSelection {
    pub selected_resource_ids: Vec<String>,
}

impl DatasetSelection {
    /// Parse a raw model response.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::Response`] if no valid object can be found.
    pub fn from_response(raw: &str) -> Result<Self> {
        parse_structured_response(raw)
    }

    /// The selected ids as a set, for use with [`socrata_search::find_datasets`].
    pub fn into_id_set(self) -> HashSet<String> {
        self.selected_resource_ids.into_iter().collect()
    }
}

/// Parse a JSON object out of a model response.
///
/// Accepts raw text which may contain markdown fences or extra prose.
///
/// # Errors
///
/// Returns [`ExplorerError::Response`] when the isolated body is not valid
/// JSON for `T`.
pub fn parse_structured_response<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let body = extract_json_block(raw);
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(error = %e, "structured response parse failed");
        ExplorerError::Response(e.to_string())
    })
}

/// Isolate the JSON body of a model response.
///
/// Prefers the contents of the first markdown fence (with or without a
/// language tag), then the outermost `{ ... }` span, then the whole text.
fn extract_json_block(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(fenced) = fenced_body(trimmed) {
        return fenced;
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Contents of the first closed ```` ``` ```` fence, minus its info string.
fn fenced_body(text: &str) -> Option<&str> {
    let (_, after_open) = text.split_once("```")?;
    let (inner, _) = after_open.split_once("```")?;
    // The info string (`json`, `JSON`, ...) runs up to the first newline.
    let body = match inner.split_once('\n') {
        Some((info, rest)) if !info.trim_start().starts_with(['{', '[']) => rest,
        _ => inner,
    };
    Some(body.trim())
}
