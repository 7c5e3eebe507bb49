//! Application state shared across handlers.

use std::net::IpAddr;
use std::sync::Arc;

use clickhouse_store::ClickHouseClient;
use enrich::{GeoClient, UaClassifier};
use queue::BatchQueue;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Intake handle of the batching queue.
    pub queue: BatchQueue,
    /// Columnar store, used by the stats reader.
    pub clickhouse: Arc<ClickHouseClient>,
    /// Geolocation oracle client.
    pub geo: GeoClient,
    /// User-agent classifier.
    pub ua: Arc<UaClassifier>,
    /// Administrative client-IP override (`--ip`), read-only after startup.
    pub ip_override: Option<IpAddr>,
}

impl AppState {
    pub fn new(
        queue: BatchQueue,
        clickhouse: Arc<ClickHouseClient>,
        geo: GeoClient,
        ip_override: Option<IpAddr>,
    ) -> Self {
        Self {
            queue,
            clickhouse,
            geo,
            ua: Arc::new(UaClassifier::new()),
            ip_override,
        }
    }
}
