//! The seam between the batching queue and the columnar store.

use async_trait::async_trait;

use crate::error::Result;
use crate::event::EnrichedEvent;

/// Destination for flushed event batches.
///
/// Implemented by the ClickHouse writer in production and by capture
/// mocks in tests. A batch is all-or-nothing: implementations must not
/// leave a partial batch visible on error.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Write one batch, returning the number of rows written.
    async fn write_batch(&self, events: Vec<EnrichedEvent>) -> Result<usize>;
}
