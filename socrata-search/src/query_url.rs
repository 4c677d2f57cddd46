//! Request URL construction for catalog queries.
//!
//! The query text is fully percent-encoded, so characters with meaning in a
//! URL (`&`, `#`, `+`, `=`) and non-ASCII text reach the catalog intact.
//! Spaces encode as `%20`.

/// Append `q={query}` to `base_url`.
///
/// Uses `&` when the base URL already carries a query string (for example a
/// pinned `domains=` filter), `?` otherwise.
pub fn build_query_url(base_url: &str, query: &str) -> String {
    let separator = if base_url.ends_with('?') || base_url.ends_with('&') {
        ""
    } else if base_url.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{base_url}{separator}q={}", urlencoding::encode(query))
}
