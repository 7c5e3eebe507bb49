//! Analytics database configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for the columnar store, bound from the
/// `LANTERN_ANALYTICS__*` environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickHouseConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP interface port.
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub pass: String,
    /// Database name.
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8123
}

fn default_user() -> String {
    "default".to_string()
}

fn default_name() -> String {
    "analytics".to_string()
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            pass: String::new(),
            name: default_name(),
        }
    }
}

impl ClickHouseConfig {
    /// Base URL of the HTTP interface.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
