//! Batch insert into the events table.

use async_trait::async_trait;
use chrono::Utc;
use clickhouse::Row;
use lantern_core::{day_bucket, EnrichedEvent, Error, EventSink, Result};
use serde::Serialize;
use telemetry::metrics;
use tracing::debug;

use crate::client::ClickHouseClient;

/// Flattened event row matching the `events` table columns.
///
/// `timestamp` is deliberately absent; the store defaults it to the
/// insertion wall clock.
#[derive(Debug, Clone, Row, Serialize)]
pub struct EventRow {
    pub site_id: String,
    pub occured_at: u32,
    #[serde(rename = "type")]
    pub event_type: String,
    pub user_id: String,
    pub event: String,
    pub category: String,
    pub referrer: String,
    pub referrer_domain: String,
    pub is_touch: bool,
    pub browser_name: String,
    pub os_name: String,
    pub device_type: String,
    pub country: String,
    pub region: String,
}

impl EventRow {
    /// Bind an enriched event, stamping the day bucket at insertion time.
    fn bind(event: EnrichedEvent, occured_at: u32) -> Self {
        Self {
            site_id: event.site_id,
            occured_at,
            event_type: event.event_type,
            user_id: event.user_id,
            event: event.event,
            category: event.category,
            referrer: event.referrer,
            referrer_domain: event.referrer_domain,
            is_touch: event.is_touch,
            browser_name: event.browser_name,
            os_name: event.os_name,
            device_type: event.device_type,
            country: event.country,
            region: event.region,
        }
    }
}

/// Insert one batch of enriched events.
///
/// The whole batch travels as a single insert; either all rows become
/// visible or the transport fails and none do. Errors propagate to the
/// queue, which logs and discards the batch.
pub async fn insert_events(client: &ClickHouseClient, events: Vec<EnrichedEvent>) -> Result<usize> {
    if events.is_empty() {
        return Ok(0);
    }

    let count = events.len();
    let occured_at = day_bucket(Utc::now());

    let mut insert = client
        .inner()
        .insert("events")
        .map_err(|e| Error::storage(format!("insert error: {e}")))?;

    for event in events {
        let row = EventRow::bind(event, occured_at);
        insert
            .write(&row)
            .await
            .map_err(|e| Error::storage(format!("write error: {e}")))?;
    }

    insert
        .end()
        .await
        .map_err(|e| Error::storage(format!("end error: {e}")))?;

    debug!(count = count, occured_at = occured_at, "Inserted event batch");

    Ok(count)
}

#[async_trait]
impl EventSink for ClickHouseClient {
    async fn write_batch(&self, events: Vec<EnrichedEvent>) -> Result<usize> {
        let count = insert_events(self, events).await?;
        metrics().events_flushed.inc_by(count as u64);
        Ok(count)
    }
}
