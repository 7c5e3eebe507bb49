//! Core types and validation for the lantern ingestion pipeline.

pub mod beacon;
pub mod error;
pub mod event;
pub mod referrer;
pub mod sink;

pub use beacon::*;
pub use error::{Error, Result};
pub use event::*;
pub use referrer::referrer_domain;
pub use sink::EventSink;
