//! Time-bucketed aggregate queries over the events table.
//!
//! Both query shapes lead with `site_id = ?` so the MergeTree ordering
//! key prunes before aggregation, and filter the day range in `WHERE`
//! rather than `HAVING` for the same reason. Rows come back verbatim; no
//! in-memory post-filtering, paging, or limits.

use clickhouse::Row;
use lantern_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::client::ClickHouseClient;

/// One aggregate row: a day bucket, the grouped value (page path for
/// page views, visitor identity for uniques), and its count.
#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct StatsRow {
    pub occured_at: u32,
    pub value: String,
    pub count: u64,
}

/// Page-view aggregation: one row per `(day, page-path)` pair.
const PAGE_VIEWS_SQL: &str = "\
SELECT occured_at, event AS value, count() AS count \
FROM events \
WHERE site_id = ? AND occured_at BETWEEN ? AND ? \
GROUP BY occured_at, event";

/// Unique-visitor aggregation: one row per `(day, visitor, page-path)`
/// triple. Collapsing to a per-day distinct count is the caller's job.
/// The empty identity groups as its own bucket.
const UNIQUES_SQL: &str = "\
SELECT occured_at, user_id AS value, count() AS count \
FROM events \
WHERE site_id = ? AND occured_at BETWEEN ? AND ? \
GROUP BY occured_at, user_id, event";

async fn fetch_stats(
    client: &ClickHouseClient,
    sql: &str,
    site_id: &str,
    start: u32,
    end: u32,
) -> Result<Vec<StatsRow>> {
    client
        .inner()
        .query(sql)
        .bind(site_id)
        .bind(start)
        .bind(end)
        .fetch_all::<StatsRow>()
        .await
        .map_err(|e| Error::storage(format!("stats query error: {e}")))
}

/// Count page views per day and page path over `[start, end]` day buckets.
pub async fn page_views(
    client: &ClickHouseClient,
    site_id: &str,
    start: u32,
    end: u32,
) -> Result<Vec<StatsRow>> {
    fetch_stats(client, PAGE_VIEWS_SQL, site_id, start, end).await
}

/// Count events per day, visitor, and page path over `[start, end]`.
pub async fn uniques(
    client: &ClickHouseClient,
    site_id: &str,
    start: u32,
    end: u32,
) -> Result<Vec<StatsRow>> {
    fetch_stats(client, UNIQUES_SQL, site_id, start, end).await
}
