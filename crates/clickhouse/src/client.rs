//! ClickHouse client wrapper.

use clickhouse::Client;
use lantern_core::{Error, Result};
use tracing::info;

use crate::config::ClickHouseConfig;

/// ClickHouse client wrapper.
///
/// The underlying client is an HTTP handle, safe to share across all
/// writer and reader invocations concurrently.
#[derive(Clone)]
pub struct ClickHouseClient {
    inner: Client,
    config: ClickHouseConfig,
}

impl ClickHouseClient {
    /// Creates a new ClickHouse client.
    pub fn new(config: ClickHouseConfig) -> Result<Self> {
        let mut client = Client::default()
            .with_url(config.url())
            .with_database(&config.name)
            .with_user(&config.user);

        if !config.pass.is_empty() {
            client = client.with_password(&config.pass);
        }

        info!(
            url = %config.url(),
            database = %config.name,
            "Created ClickHouse client"
        );

        Ok(Self {
            inner: client,
            config,
        })
    }

    /// Returns the inner clickhouse client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClickHouseConfig {
        &self.config
    }

    /// Round-trip connectivity check, used at boot.
    pub async fn ping(&self) -> Result<()> {
        self.inner
            .query("SELECT 1")
            .fetch_one::<u8>()
            .await
            .map(|_| ())
            .map_err(|e| Error::storage(format!("ping failed: {e}")))
    }
}
