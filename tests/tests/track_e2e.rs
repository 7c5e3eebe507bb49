//! End-to-end tests for the beacon ingest pipeline.
//!
//! These run the real router, queue, and enrichment against a capture
//! sink and an in-process geo oracle: every production code path except
//! the ClickHouse transport itself.

use integration_tests::{fixtures, setup::TestContext};
use queue::QueueConfig;

/// Queue config that flushes every event immediately, for tests that
/// inspect a single enriched event.
fn flush_each() -> QueueConfig {
    QueueConfig {
        max_batch: 1,
        ..Default::default()
    }
}

#[tokio::test]
async fn track_always_answers_empty_ok() {
    let ctx = TestContext::new().await;

    let response = ctx.track(&fixtures::encode(&fixtures::page_view("docs"))).await;

    response.assert_status_ok();
    assert_eq!(response.text(), "");

    ctx.wait_for_depth(1).await;
}

#[tokio::test]
async fn missing_data_parameter_has_no_side_effects() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/track").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "");

    ctx.settle().await;
    assert_eq!(ctx.queue.depth(), 0);
    assert_eq!(ctx.sink.event_count(), 0);
}

#[tokio::test]
async fn bad_base64_has_no_side_effects() {
    let ctx = TestContext::new().await;

    let response = ctx.track("!!!not-base64!!!").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "");

    ctx.settle().await;
    assert_eq!(ctx.queue.depth(), 0);
    assert_eq!(ctx.sink.event_count(), 0);
}

#[tokio::test]
async fn enrichment_round_trip() {
    let ctx = TestContext::with_queue_config(flush_each()).await;

    let payload = fixtures::beacon(
        "docs",
        "page",
        "v-42",
        "/pricing",
        "Page views",
        "https://example.com/blog/post?x=1",
    );
    ctx.track(&fixtures::encode(&payload)).await.assert_status_ok();

    ctx.wait_for_events(1).await;
    let event = &ctx.sink.captured_events()[0];

    // Wire fields stored verbatim.
    assert_eq!(event.site_id, "docs");
    assert_eq!(event.event_type, "page");
    assert_eq!(event.user_id, "v-42");
    assert_eq!(event.event, "/pricing");
    assert_eq!(event.category, "Page views");
    assert_eq!(event.referrer, "https://example.com/blog/post?x=1");
    assert!(!event.is_touch);

    // Derived fields.
    assert_eq!(event.referrer_domain, "example.com");
    assert_eq!(event.browser_name, "Chrome");
    assert_eq!(event.os_name, "Mac OSX");
    assert_eq!(event.device_type, "desktop");
    assert_eq!(event.country, "Norway");
    assert_eq!(event.region, "Oslo");
}

#[tokio::test]
async fn empty_referrer_stores_empty_domain() {
    let ctx = TestContext::with_queue_config(flush_each()).await;

    let payload = fixtures::page_view_from("docs", "");
    ctx.track(&fixtures::encode(&payload)).await.assert_status_ok();

    ctx.wait_for_events(1).await;
    let event = &ctx.sink.captured_events()[0];
    assert_eq!(event.referrer, "");
    assert_eq!(event.referrer_domain, "");
}

#[tokio::test]
async fn fifteen_beacons_arrive_as_one_ordered_batch() {
    let ctx = TestContext::new().await;

    for i in 0..15 {
        let payload = fixtures::page_view_as("docs", &format!("v{i}"));
        ctx.track(&fixtures::encode(&payload)).await.assert_status_ok();
    }

    ctx.wait_for_events(15).await;
    assert_eq!(ctx.sink.batch_sizes(), vec![15]);

    let identities: Vec<String> = ctx
        .sink
        .captured_events()
        .iter()
        .map(|e| e.user_id.clone())
        .collect();
    let expected: Vec<String> = (0..15).map(|i| format!("v{i}")).collect();
    assert_eq!(identities, expected);
}

#[tokio::test]
async fn forwarded_for_header_drives_the_geo_lookup() {
    let ctx = TestContext::new().await;

    let payload = fixtures::encode(&fixtures::page_view("docs"));
    ctx.track_with_header(&payload, "X-Forwarded-For", "203.0.113.5, 10.0.0.1")
        .await
        .assert_status_ok();

    ctx.wait_for_depth(1).await;
    assert_eq!(ctx.geo.seen_ips(), vec!["203.0.113.5"]);
}

#[tokio::test]
async fn geo_oracle_failure_still_stores_the_event() {
    let ctx = TestContext::with_queue_config(flush_each()).await;
    ctx.geo.set_fail(true);

    let payload = fixtures::encode(&fixtures::page_view("docs"));
    ctx.track(&payload).await.assert_status_ok();

    ctx.wait_for_events(1).await;
    let event = &ctx.sink.captured_events()[0];
    assert_eq!(event.site_id, "docs");
    assert_eq!(event.country, "");
    assert_eq!(event.region, "");
}

#[tokio::test]
async fn unparseable_client_address_drops_the_event() {
    let ctx = TestContext::new().await;

    let payload = fixtures::encode(&fixtures::page_view("docs"));
    let response = ctx
        .track_with_header(&payload, "X-Forwarded-For", "not-an-ip")
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "");

    ctx.settle().await;
    assert_eq!(ctx.queue.depth(), 0);
    assert_eq!(ctx.sink.event_count(), 0);
}

#[tokio::test]
async fn health_reports_staged_queue_depth() {
    let ctx = TestContext::new().await;

    for _ in 0..3 {
        let payload = fixtures::encode(&fixtures::page_view("docs"));
        ctx.track(&payload).await.assert_status_ok();
    }
    ctx.wait_for_depth(3).await;

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["queue_depth"], 3);
}
