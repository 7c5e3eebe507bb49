//! In-memory batching queue between the ingest handlers and the
//! columnar writer.
//!
//! Shape: a bounded intake channel feeding a single consumer task. The
//! consumer appends events to an ordered buffer and flushes it to an
//! [`EventSink`] when either trigger fires:
//!
//! - size: the buffer reaches `max_batch` events (flush immediately);
//! - time: a repeating interval tick finds the buffer non-empty.
//!
//! Whichever fires first wins; a size flush does not reset the interval.
//! A flush moves the whole buffer out under the write lock and submits it
//! as one batch. Writer errors discard the batch: at-most-once, since the
//! beacon transport cannot observe delivery anyway.

use std::sync::Arc;
use std::time::Duration;

use lantern_core::{EnrichedEvent, EventSink};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use telemetry::metrics;

fn default_max_batch() -> usize {
    15
}

fn default_flush_interval_secs() -> u64 {
    10
}

fn default_channel_capacity() -> usize {
    1024
}

/// Batching queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Buffer length at which a flush fires immediately.
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
    /// Interval of the repeating time trigger.
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    /// Intake channel bound. A full channel drops the newest event.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_batch: default_max_batch(),
            flush_interval_secs: default_flush_interval_secs(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl QueueConfig {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }
}

type Buffer = Arc<RwLock<Vec<EnrichedEvent>>>;

/// Handle to the batching queue held by the ingest handlers.
///
/// Cheap to clone; all clones feed the same consumer. Dropping every
/// clone closes the intake channel, which makes the consumer drain the
/// buffer one last time and exit.
#[derive(Clone)]
pub struct BatchQueue {
    tx: mpsc::Sender<EnrichedEvent>,
    buffer: Buffer,
}

impl BatchQueue {
    /// Start the consumer task and return the intake handle plus the
    /// task handle to await at shutdown.
    pub fn start(config: QueueConfig, sink: Arc<dyn EventSink>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let buffer: Buffer = Arc::new(RwLock::new(Vec::new()));

        let consumer = Consumer {
            rx,
            buffer: buffer.clone(),
            sink,
            config: config.clone(),
        };
        let handle = tokio::spawn(consumer.run());

        info!(
            max_batch = config.max_batch,
            flush_interval_secs = config.flush_interval_secs,
            "Batching queue started"
        );

        (Self { tx, buffer }, handle)
    }

    /// Offer an event to the intake channel without blocking.
    ///
    /// A full channel means the consumer is stalled; the event is dropped
    /// and counted rather than delaying the HTTP response.
    pub fn enqueue(&self, event: EnrichedEvent) {
        metrics().events_received.inc();

        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                metrics().events_dropped.inc();
                warn!("intake channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                warn!("intake channel closed, dropping event");
            }
        }
    }

    /// Number of events staged in the buffer, awaiting a flush.
    pub fn depth(&self) -> usize {
        self.buffer.read().len()
    }
}

/// The single task that owns the buffer and flush scheduling.
struct Consumer {
    rx: mpsc::Receiver<EnrichedEvent>,
    buffer: Buffer,
    sink: Arc<dyn EventSink>,
    config: QueueConfig,
}

impl Consumer {
    async fn run(mut self) {
        let mut ticker = interval(self.config.flush_interval());

        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(event) => {
                        let staged = {
                            let mut buffer = self.buffer.write();
                            buffer.push(event);
                            buffer.len()
                        };

                        if staged >= self.config.max_batch {
                            self.flush().await;
                        }
                    }
                    // All senders gone: final drain, then exit.
                    None => {
                        if !self.buffer.read().is_empty() {
                            self.flush().await;
                        }
                        info!("intake channel closed, queue consumer exiting");
                        return;
                    }
                },
                _ = ticker.tick() => {
                    if !self.buffer.read().is_empty() {
                        self.flush().await;
                    }
                }
            }
        }
    }

    /// Drain the buffer and submit it as one batch.
    ///
    /// The lock is released before the submit; a writer error does not
    /// restore the drained events.
    async fn flush(&self) {
        let batch = std::mem::take(&mut *self.buffer.write());
        let count = batch.len();

        match self.sink.write_batch(batch).await {
            Ok(written) => {
                metrics().batches_flushed.inc();
                debug!(count = written, "flushed event batch");
            }
            Err(e) => {
                metrics().flush_errors.inc();
                error!(count = count, error = %e, "error while inserting batch, {count} events discarded");
            }
        }
    }
}
