//! Mock implementations for testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use lantern_core::{EnrichedEvent, Error, EventSink, Result};
use parking_lot::Mutex;

/// Sink that captures flushed batches in memory.
///
/// Implements the same `EventSink` trait as the ClickHouse writer, so
/// tests verify the exact batches the store would receive without a
/// running ClickHouse.
#[derive(Clone, Default)]
pub struct CaptureSink {
    batches: Arc<Mutex<Vec<Vec<EnrichedEvent>>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events, flattened across batches in arrival order.
    pub fn captured_events(&self) -> Vec<EnrichedEvent> {
        self.batches.lock().iter().flatten().cloned().collect()
    }

    /// Sizes of the captured batches, in arrival order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().iter().map(Vec::len).collect()
    }

    pub fn event_count(&self) -> usize {
        self.batches.lock().iter().map(Vec::len).sum()
    }

    pub fn clear(&self) {
        self.batches.lock().clear();
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }
}

#[async_trait]
impl EventSink for CaptureSink {
    async fn write_batch(&self, events: Vec<EnrichedEvent>) -> Result<usize> {
        if *self.should_fail.lock() {
            return Err(Error::storage("capture sink failure"));
        }

        let count = events.len();
        self.batches.lock().push(events);
        Ok(count)
    }
}

/// In-process geolocation oracle.
///
/// Serves the echoip-style `/json?ip=` contract on an ephemeral loopback
/// port and records every `ip` parameter it is asked about.
pub struct MockGeoOracle {
    pub endpoint: String,
    seen: Arc<Mutex<Vec<String>>>,
    fail: Arc<AtomicBool>,
}

impl MockGeoOracle {
    /// Start the oracle, answering every lookup with the given location.
    pub async fn start(country: &str, region: &str) -> Self {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let fail = Arc::new(AtomicBool::new(false));

        let country = country.to_string();
        let region = region.to_string();
        let handler_seen = seen.clone();
        let handler_fail = fail.clone();

        let app = Router::new().route(
            "/json",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let seen = handler_seen.clone();
                let fail = handler_fail.clone();
                let country = country.clone();
                let region = region.clone();
                async move {
                    let ip = params.get("ip").cloned().unwrap_or_default();
                    seen.lock().push(ip.clone());

                    if fail.load(Ordering::SeqCst) {
                        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                    }

                    Json(serde_json::json!({
                        "ip": ip,
                        "country": country,
                        "country_iso": "XX",
                        "region_name": region,
                        "region_code": "XX-01",
                        "city": "Testville",
                        "latitude": 0.0,
                        "longitude": 0.0,
                    }))
                    .into_response()
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock geo oracle");
        let addr: SocketAddr = listener.local_addr().expect("No local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            endpoint: format!("http://{addr}"),
            seen,
            fail,
        }
    }

    /// Every `ip` query parameter the oracle has been asked about.
    pub fn seen_ips(&self) -> Vec<String> {
        self.seen.lock().clone()
    }

    /// Make subsequent lookups answer 500.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}
