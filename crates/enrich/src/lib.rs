//! Server-side enrichment for beacon events.

pub mod geo;
pub mod ua;

pub use geo::{GeoClient, GeoConfig, GeoInfo};
pub use ua::{UaClassifier, UaInfo};
