//! Event table schema.
//!
//! A single append-only table. The MergeTree ordering key
//! `(site_id, occured_at)` is what makes the stats queries range scans;
//! every reader predicate must start with `site_id`.

use crate::client::ClickHouseClient;
use lantern_core::{Error, Result};
use tracing::debug;

/// SQL for creating the events table.
///
/// Rows are never updated or deleted. `timestamp` is supplied by the
/// server at insertion; every other column is bound by the batch writer.
pub const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    site_id String NOT NULL,
    occured_at UInt32 NOT NULL,
    type String NOT NULL,
    user_id String NOT NULL,
    event String NOT NULL,
    category String NOT NULL,
    referrer String NOT NULL,
    referrer_domain String NOT NULL,
    is_touch BOOLEAN NOT NULL,
    browser_name String NOT NULL,
    os_name String NOT NULL,
    device_type String NOT NULL,
    country String NOT NULL,
    region String NOT NULL,
    timestamp DateTime DEFAULT now()
)
ENGINE MergeTree
ORDER BY (site_id, occured_at)
"#;

/// Initialize the events schema. Idempotent; invoked at boot.
pub async fn init_schema(client: &ClickHouseClient) -> Result<()> {
    client
        .inner()
        .query(CREATE_EVENTS_TABLE)
        .execute()
        .await
        .map_err(|e| Error::storage(format!("schema init error: {e}")))?;

    debug!("events schema initialized");
    Ok(())
}
