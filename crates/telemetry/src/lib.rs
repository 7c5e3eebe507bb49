//! Internal telemetry for the lantern server: structured logging setup
//! and a handful of in-process pipeline counters.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;
