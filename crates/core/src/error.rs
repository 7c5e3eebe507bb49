//! Unified error types for the ingestion pipeline.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the ingestion pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Beacon payload could not be decoded (bad base64, bad JSON, missing envelope fields).
    #[error("decode error: {0}")]
    Decode(String),

    /// The originating client address could not be determined.
    #[error("could not parse IP: {0}")]
    AddressUnparseable(String),

    /// The geolocation oracle failed. Always a soft failure for ingestion.
    #[error("geo lookup failed: {0}")]
    Geo(String),

    /// The columnar store rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn address_unparseable(msg: impl Into<String>) -> Self {
        Self::AddressUnparseable(msg.into())
    }

    pub fn geo(msg: impl Into<String>) -> Self {
        Self::Geo(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error on the stats surface.
    ///
    /// The ingest surface never maps errors to statuses; it is always 200.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Decode(_) => 400,
            Self::AddressUnparseable(_) => 400,
            Self::Geo(_) => 502,
            Self::Storage(_) => 500,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
        }
    }
}
