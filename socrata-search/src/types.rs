//! Typed model of the catalog search API response.
//!
//! The schema is strict: every non-optional field must be present and of
//! the right type, otherwise the whole envelope is rejected with a
//! [`ValidationError`] naming the field path. The single exception is the
//! set of resource timestamps, which upstream formats inconsistently; a
//! timestamp that cannot be parsed becomes `None` instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Page-view counters for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageViews {
    pub page_views_last_week: i64,
    pub page_views_last_month: i64,
    pub page_views_total: i64,
    pub page_views_last_week_log: f64,
    pub page_views_last_month_log: f64,
    pub page_views_total_log: f64,
}

/// Metadata of a single catalog dataset.
///
/// Column metadata is held as parallel sequences, one entry per column.
/// The model does not enforce equal lengths; see [`Resource::columns_consistent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    /// Catalog-wide unique, stable identifier (the "four-by-four").
    pub id: String,
    #[serde(default)]
    pub resource_name: Option<String>,
    pub parent_fxf: Vec<Value>,
    pub description: String,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub attribution_link: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(rename = "updatedAt", default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub metadata_updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub data_updated_at: Option<DateTime<Utc>>,
    pub page_views: PageViews,
    pub columns_name: Vec<String>,
    pub columns_field_name: Vec<String>,
    pub columns_datatype: Vec<String>,
    pub columns_description: Vec<String>,
    pub columns_format: Vec<Map<String, Value>>,
    pub download_count: i64,
    pub provenance: String,
    pub lens_view_type: String,
    pub lens_display_type: String,
    pub locked: bool,
    #[serde(default)]
    pub blob_mime_type: Option<String>,
    pub hide_from_data_json: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub publication_date: Option<DateTime<Utc>>,
}

/// One column of a resource, assembled from the parallel column sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column<'a> {
    pub name: &'a str,
    pub field_name: &'a str,
    pub datatype: &'a str,
    pub description: &'a str,
}

impl Resource {
    /// Number of columns, taken from `columns_name`.
    pub fn column_count(&self) -> usize {
        self.columns_name.len()
    }

    /// Whether the resource describes any columns at all. Resources without
    /// columns are dropped from merged search output.
    pub fn has_columns(&self) -> bool {
        !self.columns_name.is_empty()
    }

    /// Whether all parallel column sequences have the same length.
    pub fn columns_consistent(&self) -> bool {
        let n = self.columns_name.len();
        self.columns_field_name.len() == n
            && self.columns_datatype.len() == n
            && self.columns_description.len() == n
            && self.columns_format.len() == n
    }

    /// Iterate the columns as zipped rows. Stops at the shortest sequence
    /// if the parallel sequences disagree in length.
    pub fn columns(&self) -> impl Iterator<Item = Column<'_>> {
        self.columns_name
            .iter()
            .zip(&self.columns_field_name)
            .zip(&self.columns_datatype)
            .zip(&self.columns_description)
            .map(|(((name, field_name), datatype), description)| Column {
                name,
                field_name,
                datatype,
                description,
            })
    }
}

/// Categorical and tag metadata for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default)]
    pub domain_category: Option<String>,
    pub domain_tags: Vec<String>,
    pub domain_metadata: Vec<Map<String, Value>>,
}

/// Hosting domain of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub domain: String,
    #[serde(default)]
    pub license: Option<String>,
}

/// A catalog user, used for both the owner and the creator of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub user_type: String,
    pub display_name: String,
}

/// One catalog entry returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub resource: Resource,
    pub classification: Classification,
    pub metadata: Metadata,
    pub permalink: String,
    pub link: String,
    pub owner: User,
    pub creator: User,
}

impl SearchResult {
    /// Identity used for deduplication and selection.
    pub fn id(&self) -> &str {
        &self.resource.id
    }
}

/// Server-side timing diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    #[serde(rename = "serviceMillis")]
    pub service_millis: i64,
    #[serde(rename = "searchMillis")]
    pub search_millis: Vec<i64>,
}

/// Envelope wrapping the results of one catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchApiResponse {
    pub results: Vec<SearchResult>,
    #[serde(rename = "resultSetSize")]
    pub result_set_size: i64,
    pub timings: Timings,
    #[serde(default)]
    pub warnings: Vec<Value>,
}

impl SearchApiResponse {
    /// Parse an envelope from a raw JSON body.
    pub fn from_json(body: &str) -> Result<Self, ValidationError> {
        let mut de = serde_json::Deserializer::from_str(body);
        let parsed = serde_path_to_error::deserialize(&mut de).map_err(into_validation_error)?;
        de.end().map_err(|e| ValidationError {
            path: String::new(),
            message: e.to_string(),
        })?;
        Ok(parsed)
    }

    /// Parse an envelope from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        serde_path_to_error::deserialize(value).map_err(into_validation_error)
    }
}

fn into_validation_error<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> ValidationError {
    ValidationError {
        path: err.path().to_string(),
        message: err.inner().to_string(),
    }
}

/// Deserialize an optional timestamp, resolving anything unparseable to `None`.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(parse_lenient_datetime))
}

/// ISO-8601 layouts with an explicit offset, tried after RFC 3339.
///
/// Covers minute precision, offsets without a colon and the basic
/// (compact) layout.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y%m%dT%H%M%S%.f%:z",
    "%Y%m%dT%H%M%S%.f%z",
    "%Y%m%dT%H%M%:z",
    "%Y%m%dT%H%M%z",
];

/// Offset-less layouts, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parse an ISO-8601 timestamp after rewriting a trailing `Z` to `+00:00`.
///
/// Accepts extended and basic layouts, second or minute precision, and
/// offsets with or without a colon. Offset-less date-times and bare dates
/// are taken to be UTC.
pub fn parse_lenient_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_owned(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
