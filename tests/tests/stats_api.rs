//! Tests for the stats surface error contract.
//!
//! The happy path needs a live ClickHouse; here we pin down the HTTP
//! behavior around it: undecodable bodies are the client's fault,
//! storage failures are ours.

use axum::http::StatusCode;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/stats")
        .content_type("application/json")
        .bytes("{definitely not json".into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn storage_failure_is_a_plain_text_500() {
    let ctx = TestContext::new().await;

    // The context points the store at a port nothing listens on.
    let response = ctx
        .server
        .post("/stats")
        .content_type("application/json")
        .bytes(r#"{"site_id":"docs","start":20240101,"end":20240131,"what":"pv"}"#.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().is_empty());
}

#[tokio::test]
async fn unknown_metric_defaults_to_page_views() {
    let ctx = TestContext::new().await;

    // Unknown selector still routes to a query (which then fails at the
    // unreachable store) instead of being rejected.
    let response = ctx
        .server
        .post("/stats")
        .content_type("application/json")
        .bytes(r#"{"site_id":"docs","start":20240101,"end":20240131,"what":"nonsense"}"#.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn trailing_slash_route_is_mounted() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/stats/")
        .content_type("application/json")
        .bytes("not json".into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
