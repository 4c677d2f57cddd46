//! Integration tests for the catalog search pipeline.
//!
//! These tests exercise fan-out → fetch → parse → merge against a local
//! mock catalog server (no external network). Response timing is scripted
//! to check that output order follows query order, not completion order.

use std::collections::HashSet;
use std::time::Duration;

use serde_json::{json, Value};
use socrata_search::{
    find_datasets, get_search_results, search_with_report, FailurePolicy, SearchConfig,
    SearchError, SearchResult,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG_PATH: &str = "/api/catalog/v1";

fn make_result(id: &str, columns: usize) -> Value {
    let names: Vec<String> = (0..columns).map(|i| format!("col {i}")).collect();
    let fields: Vec<String> = (0..columns).map(|i| format!("col_{i}")).collect();
    let types: Vec<&str> = (0..columns).map(|_| "number").collect();
    let descriptions: Vec<&str> = (0..columns).map(|_| "").collect();
    let formats: Vec<Value> = (0..columns).map(|_| json!({})).collect();
    json!({
        "resource": {
            "name": format!("Dataset {id}"),
            "id": id,
            "resource_name": null,
            "parent_fxf": [],
            "description": "",
            "type": "dataset",
            "updatedAt": "2024-02-29T10:15:00.000Z",
            "createdAt": "2019-01-01T00:00:00Z",
            "metadata_updated_at": "garbage",
            "data_updated_at": null,
            "page_views": {
                "page_views_last_week": 0,
                "page_views_last_month": 1,
                "page_views_total": 2,
                "page_views_last_week_log": 0.0,
                "page_views_last_month_log": 1.0,
                "page_views_total_log": 1.58
            },
            "columns_name": names,
            "columns_field_name": fields,
            "columns_datatype": types,
            "columns_description": descriptions,
            "columns_format": formats,
            "download_count": 7,
            "provenance": "official",
            "lens_view_type": "tabular",
            "lens_display_type": "table",
            "locked": false,
            "blob_mime_type": null,
            "hide_from_data_json": false
        },
        "classification": {
            "categories": [],
            "tags": [],
            "domain_tags": [],
            "domain_metadata": []
        },
        "metadata": {"domain": "data.cityofexample.gov"},
        "permalink": format!("https://data.cityofexample.gov/d/{id}"),
        "link": format!("https://data.cityofexample.gov/-/-/{id}"),
        "owner": {"id": "own-0001", "user_type": "interactive", "display_name": "Owner"},
        "creator": {"id": "crt-0001", "user_type": "interactive", "display_name": "Creator"}
    })
}

fn make_envelope(results: Vec<Value>) -> Value {
    let size = results.len();
    json!({
        "results": results,
        "resultSetSize": size,
        "timings": {"serviceMillis": 3, "searchMillis": [1, 1]}
    })
}

fn config_for(server: &MockServer, policy: FailurePolicy) -> SearchConfig {
    SearchConfig {
        base_url: format!("{}{CATALOG_PATH}", server.uri()),
        timeout_seconds: 5,
        max_concurrency: None,
        failure_policy: policy,
        user_agent: Some("CatalogTest/1.0".into()),
    }
}

async fn mount_query(server: &MockServer, query: &str, body: Value, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("q", query))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn ids(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(SearchResult::id).collect()
}

#[tokio::test]
async fn overlapping_queries_dedup_and_filter() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "parks",
        make_envelope(vec![make_result("p1", 3), make_result("p2", 0)]),
        0,
    )
    .await;
    mount_query(
        &server,
        "recreation",
        make_envelope(vec![make_result("p1", 3), make_result("p3", 2)]),
        0,
    )
    .await;

    let config = config_for(&server, FailurePolicy::Isolate);
    let results = get_search_results(&["parks", "recreation"], &config)
        .await
        .expect("search succeeds");

    assert_eq!(ids(&results), vec!["p1", "p3"]);
    let p1 = &results[0].resource;
    assert!(p1.updated_at.is_some());
    assert!(p1.metadata_updated_at.is_none());
    assert!(p1.data_updated_at.is_none());
}

#[tokio::test]
async fn slow_first_query_still_merges_first() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "slow",
        make_envelope(vec![make_result("shared", 1), make_result("s1", 1)]),
        200,
    )
    .await;
    mount_query(
        &server,
        "fast",
        make_envelope(vec![make_result("f1", 1), make_result("shared", 4)]),
        0,
    )
    .await;

    let config = config_for(&server, FailurePolicy::Isolate);
    let results = get_search_results(&["slow", "fast"], &config)
        .await
        .expect("search succeeds");

    assert_eq!(ids(&results), vec!["shared", "s1", "f1"]);
    // First occurrence (from the slow query) is the one kept.
    assert_eq!(results[0].resource.column_count(), 1);
}

#[tokio::test]
async fn query_text_is_fully_percent_encoded() {
    let server = MockServer::start().await;
    // `query_param` matches the decoded value; the mock only answers if
    // `&`, `#`, `+` and non-ASCII survived the round trip intact.
    mount_query(
        &server,
        "fish & game #1 + café",
        make_envelope(vec![make_result("fg01", 2)]),
        0,
    )
    .await;

    let config = config_for(&server, FailurePolicy::FailFast);
    let results = get_search_results(&["fish & game #1 + café"], &config)
        .await
        .expect("search succeeds");
    assert_eq!(ids(&results), vec!["fg01"]);
}

#[tokio::test]
async fn requests_send_accept_and_user_agent_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(header("accept", "application/json"))
        .and(header("user-agent", "CatalogTest/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(make_envelope(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, FailurePolicy::FailFast);
    let results = get_search_results(&["anything"], &config)
        .await
        .expect("search succeeds");
    assert!(results.is_empty());
}

#[tokio::test]
async fn server_error_is_isolated_to_its_query() {
    let server = MockServer::start().await;
    mount_query(&server, "good", make_envelope(vec![make_result("g1", 1)]), 0).await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("q", "bad"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = config_for(&server, FailurePolicy::Isolate);
    let report = search_with_report(&["bad", "good"], &config)
        .await
        .expect("partial batch succeeds");

    assert_eq!(ids(&report.results), vec!["g1"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].query, "bad");
    assert!(matches!(report.failures[0].error, SearchError::Http(_)));
    assert!(report.failures[0].error.to_string().contains("500"));
}

#[tokio::test]
async fn server_error_aborts_batch_under_fail_fast() {
    let server = MockServer::start().await;
    mount_query(&server, "good", make_envelope(vec![make_result("g1", 1)]), 0).await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("q", "bad"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = config_for(&server, FailurePolicy::FailFast);
    let err = get_search_results(&["good", "bad"], &config)
        .await
        .unwrap_err();
    match err {
        SearchError::QueryFailed { query, .. } => assert_eq!(query, "bad"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_envelope_names_field_path() {
    let server = MockServer::start().await;
    let mut broken = make_result("b1", 2);
    broken["owner"]["display_name"] = json!(17);
    mount_query(&server, "broken", make_envelope(vec![broken]), 0).await;
    mount_query(&server, "fine", make_envelope(vec![make_result("f1", 1)]), 0).await;

    let config = config_for(&server, FailurePolicy::Isolate);
    let report = search_with_report(&["broken", "fine"], &config)
        .await
        .expect("partial batch succeeds");

    assert_eq!(ids(&report.results), vec!["f1"]);
    match &report.failures[0].error {
        SearchError::Validation(err) => {
            assert_eq!(err.path, "results[0].owner.display_name");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_validation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let config = config_for(&server, FailurePolicy::FailFast);
    let err = get_search_results(&["parks"], &config).await.unwrap_err();
    match err {
        SearchError::QueryFailed { source, .. } => {
            assert!(matches!(*source, SearchError::Validation(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn slow_response_times_out_per_query() {
    let server = MockServer::start().await;
    mount_query(&server, "quick", make_envelope(vec![make_result("q1", 1)]), 0).await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("q", "stuck"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(make_envelope(vec![make_result("s1", 1)]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = SearchConfig {
        timeout_seconds: 1,
        ..config_for(&server, FailurePolicy::Isolate)
    };
    let report = search_with_report(&["stuck", "quick"], &config)
        .await
        .expect("partial batch succeeds");

    assert_eq!(ids(&report.results), vec!["q1"]);
    assert!(matches!(report.failures[0].error, SearchError::Timeout(_)));
}

#[tokio::test]
async fn merged_results_feed_selection() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "transit",
        make_envelope(
            ["a", "b", "c", "d", "e"]
                .iter()
                .map(|id| make_result(id, 1))
                .collect(),
        ),
        0,
    )
    .await;

    let config = config_for(&server, FailurePolicy::Isolate);
    let all = get_search_results(&["transit"], &config)
        .await
        .expect("search succeeds");
    let selected: HashSet<String> = ["c", "a"].iter().map(|s| (*s).to_owned()).collect();

    assert_eq!(ids(&find_datasets(&all, &selected)), vec!["a", "c"]);
}
