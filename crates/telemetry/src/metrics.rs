//! In-process pipeline counters.
//!
//! Counts are process-local and reset on restart; they exist for the
//! health endpoint and for diagnostic logs, not for durable reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// A monotonically increasing counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counters covering the ingest pipeline from beacon to batch insert.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    /// Beacons accepted by the ingest handler and offered to the queue.
    pub events_received: Counter,
    /// Beacons rejected at the edge (bad payload, unparseable address).
    pub beacons_rejected: Counter,
    /// Events dropped because the intake channel was full.
    pub events_dropped: Counter,
    /// Events delivered to the columnar writer.
    pub events_flushed: Counter,
    /// Batches flushed to the columnar writer.
    pub batches_flushed: Counter,
    /// Batches discarded after a writer error.
    pub flush_errors: Counter,
}

static METRICS: OnceLock<PipelineMetrics> = OnceLock::new();

/// Global pipeline metrics.
pub fn metrics() -> &'static PipelineMetrics {
    METRICS.get_or_init(PipelineMetrics::default)
}
