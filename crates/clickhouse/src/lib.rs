//! ClickHouse event store for the ingestion pipeline.

pub mod client;
pub mod config;
pub mod insert;
pub mod schema;
pub mod stats;

pub use client::*;
pub use config::*;
pub use insert::insert_events;
pub use schema::init_schema;
pub use stats::{page_views, uniques, StatsRow};
