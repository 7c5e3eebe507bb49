//! Geolocation client.
//!
//! Resolves a client IP to country/region via an external echoip-style
//! HTTP oracle. Every failure mode here is soft: ingestion continues with
//! empty geo fields rather than dropping the event.

use std::net::IpAddr;
use std::time::Duration;

use lantern_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Upper bound on a single oracle round-trip. Elapsed time counts as a
/// soft failure like any other.
const GEO_TIMEOUT: Duration = Duration::from_secs(2);

fn default_endpoint() -> String {
    "http://localhost:3002".to_string()
}

/// Geolocation oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Base URL of the oracle; the lookup path is `<endpoint>/json?ip=`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

/// Response body of the oracle. The pipeline consumes `country` and
/// `region_name`; the rest is decoded and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoInfo {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_iso: String,
    #[serde(default)]
    pub region_name: String,
    #[serde(default)]
    pub region_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// Client for the geolocation oracle.
#[derive(Clone)]
pub struct GeoClient {
    endpoint: String,
    http: reqwest::Client,
}

impl GeoClient {
    pub fn new(config: GeoConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(GEO_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Resolve an IP through the oracle.
    pub async fn lookup(&self, ip: IpAddr) -> Result<GeoInfo> {
        let url = format!("{}/json", self.endpoint);

        let response = self
            .http
            .get(&url)
            .query(&[("ip", ip.to_string())])
            .send()
            .await
            .map_err(|e| Error::geo(format!("oracle unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::geo(format!(
                "oracle returned {}",
                response.status()
            )));
        }

        response
            .json::<GeoInfo>()
            .await
            .map_err(|e| Error::geo(format!("undecodable oracle body: {e}")))
    }

    /// Resolve an IP, degrading to empty geo fields on any failure.
    pub async fn lookup_or_default(&self, ip: IpAddr) -> GeoInfo {
        match self.lookup(ip).await {
            Ok(info) => info,
            Err(e) => {
                warn!(ip = %ip, error = %e, "geo lookup failed, continuing with empty fields");
                GeoInfo::default()
            }
        }
    }
}
