//! Lantern analytics server.
//!
//! Ingestion and aggregation core for self-hosted web analytics:
//! - beacon decoding and enrichment at the network edge
//! - bounded in-memory batching with size and interval flush triggers
//! - append-only ClickHouse event store ordered by (site_id, occured_at)
//! - day-bucketed page-view and unique-visitor aggregates

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use api::AppState;
use clickhouse_store::{init_schema, ClickHouseClient, ClickHouseConfig};
use enrich::{GeoClient, GeoConfig};
use lantern_core::EventSink;
use queue::{BatchQueue, QueueConfig};
use telemetry::init_tracing_from_env;

#[derive(Debug, Parser)]
#[command(name = "lantern", version, about = "Self-hosted web analytics server")]
struct Cli {
    /// Force the resolved client IP for every request, useful in local
    /// development where everything arrives from loopback.
    #[arg(long)]
    ip: Option<IpAddr>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct ApiConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_read_header_timeout_secs")]
    read_header_timeout_secs: u64,
    #[serde(default = "default_graceful_timeout_secs")]
    graceful_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3080
}

fn default_read_header_timeout_secs() -> u64 {
    60
}

fn default_graceful_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            read_header_timeout_secs: default_read_header_timeout_secs(),
            graceful_timeout_secs: default_graceful_timeout_secs(),
        }
    }
}

/// Metadata database (sites, users, API keys). Owned by the dashboard;
/// this process only holds a handle, verified reachable at boot.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct MetadataDbConfig {
    #[serde(default = "default_metadata_host")]
    host: String,
    #[serde(default = "default_metadata_port")]
    port: u16,
    #[serde(default = "default_metadata_user")]
    user: String,
    #[serde(default)]
    pass: String,
    #[serde(default = "default_metadata_name")]
    name: String,
    #[serde(default = "default_metadata_ssl_mode")]
    ssl_mode: String,
}

fn default_metadata_host() -> String {
    "localhost".to_string()
}

fn default_metadata_port() -> u16 {
    5432
}

fn default_metadata_user() -> String {
    "postgres".to_string()
}

fn default_metadata_name() -> String {
    "lantern".to_string()
}

fn default_metadata_ssl_mode() -> String {
    "disable".to_string()
}

impl Default for MetadataDbConfig {
    fn default() -> Self {
        Self {
            host: default_metadata_host(),
            port: default_metadata_port(),
            user: default_metadata_user(),
            pass: String::new(),
            name: default_metadata_name(),
            ssl_mode: default_metadata_ssl_mode(),
        }
    }
}

impl MetadataDbConfig {
    fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.pass, self.host, self.port, self.name, self.ssl_mode
        )
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    api: ApiConfig,

    /// Columnar analytics store.
    #[serde(default)]
    analytics: ClickHouseConfig,

    #[serde(default)]
    metadata: MetadataDbConfig,

    #[serde(default)]
    geo: GeoConfig,

    #[serde(default)]
    queue: QueueConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    let cli = Cli::parse();
    let config = load_config()?;

    info!("Starting lantern v{}", env!("CARGO_PKG_VERSION"));
    if let Some(ip) = cli.ip {
        info!(ip = %ip, "Client IP override active");
    }

    // Columnar store: unreachable or uncreatable schema is fatal.
    let clickhouse = Arc::new(
        ClickHouseClient::new(config.analytics.clone())
            .context("Failed to create ClickHouse client")?,
    );
    clickhouse
        .ping()
        .await
        .context("Analytics database unreachable")?;
    init_schema(&clickhouse)
        .await
        .context("Failed to initialize events schema")?;

    // Metadata database handle; the dashboard owns its contents.
    let metadata = PgPoolOptions::new()
        .max_connections(4)
        .connect(&config.metadata.url())
        .await
        .context("Metadata database unreachable")?;

    // Start the batching queue draining into the columnar writer.
    let (queue, consumer) = BatchQueue::start(
        config.queue.clone(),
        clickhouse.clone() as Arc<dyn EventSink>,
    );

    let state = AppState::new(
        queue.clone(),
        clickhouse.clone(),
        GeoClient::new(config.geo.clone()),
        cli.ip,
    );

    let app = api::router(state).layer(TimeoutLayer::new(Duration::from_secs(
        config.api.read_header_timeout_secs,
    )));

    let addr: SocketAddr = format!("{}:{}", config.api.host, config.api.port)
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Shutting down...");

    // Close the intake channel and give the consumer the grace window to
    // drain what is still buffered.
    drop(queue);
    let grace = Duration::from_secs(config.api.graceful_timeout_secs);
    if tokio::time::timeout(grace, consumer).await.is_err() {
        error!("queue drain exceeded the grace window, pending events lost");
    }

    metadata.close().await;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from defaults, an optional config file, and the
/// `LANTERN`-prefixed environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("LANTERN")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
