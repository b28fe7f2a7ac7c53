//! Equipment analytics HTTP server binary.
//!
//! Loads the configuration, creates the in-memory repository, sets up the
//! HTTP router and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin equipment-server
//!
//! # Custom config file and port
//! EQUIPMENT_CONFIG=./equipment.toml PORT=9000 cargo run --bin equipment-server
//! ```
//!
//! # Environment Variables
//!
//! - `EQUIPMENT_CONFIG`: Path to a TOML config file (default: search for `equipment.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `MAX_UPLOAD_MB`: Request body limit in MiB (default: 10)
//! - `IQR_MULTIPLIER`: Outlier fence multiplier (default: 1.5)
//! - `MIN_OUTLIER_SAMPLES`: Minimum values before outliers are screened (default: 4)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use equipment_analytics::config::AppConfig;
use equipment_analytics::db::{FullRepository, LocalRepository};
use equipment_analytics::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting equipment analytics server");

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!(
        iqr_multiplier = config.analytics.iqr_multiplier,
        min_outlier_samples = config.analytics.min_outlier_samples,
        max_upload_mb = config.server.max_upload_mb,
        "Configuration loaded"
    );

    let repository: Arc<dyn FullRepository> = Arc::new(LocalRepository::new());
    info!("In-memory repository initialized");

    let state = AppState::from_config(repository, &config);
    let app = create_router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
