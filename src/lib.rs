//! Open Data Explorer: find open datasets that answer a question.
//!
//! A question is turned into several catalog queries by a
//! [`QueryGenerator`], the queries are searched concurrently through
//! [`socrata_search`], and a [`DatasetSelector`] picks the relevant datasets
//! from the merged, deduplicated candidates.
//!
//! # Architecture
//!
//! - **Collaborators**: traits for the language-model steps, supplied by the caller
//! - **Structured responses**: strict parsing of model JSON output
//! - **Explorer**: the generate → search → select pipeline
//! - **Config**: TOML-backed catalog settings

pub mod collaborators;
pub mod config;
pub mod error;
pub mod explorer;
pub mod structured;

pub use collaborators::{DatasetSelector, FixedQueries, QueryGenerator, SelectAll, SelectIds};
pub use config::{CatalogConfig, ExplorerConfig};
pub use error::{ExplorerError, Result};
pub use explorer::{Exploration, Explorer};
pub use structured::{
    normalize_queries, parse_structured_response, DatasetSelection, SearchQueries,
};
