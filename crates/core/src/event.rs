//! Enriched events and the day-bucket encoding.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// A tracking record joined with its server-derived attributes, ready for
/// the batching queue.
///
/// Absent sources always produce the empty string, never a null; every
/// column in the store is non-nullable. The `occured_at` day bucket is
/// stamped by the columnar writer at insertion time, so it is not carried
/// here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichedEvent {
    pub site_id: String,
    pub event_type: String,
    /// Visitor identity stored verbatim; the unit of unique-visitor counts.
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

/// Encode an instant as the `YYYYMMDD` day bucket, in UTC.
///
/// The coarsest time unit the store distinguishes, and the second half of
/// the table's `(site_id, occured_at)` ordering key.
pub fn day_bucket(at: DateTime<Utc>) -> u32 {
    at.year() as u32 * 10_000 + at.month() * 100 + at.day()
}
