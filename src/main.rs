use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use price_monitor::api;
use price_monitor::browser::build_fetcher;
use price_monitor::llm::GeminiClient;
use price_monitor::models::Site;
use price_monitor::storage::{SqliteStorage, Storage};
use price_monitor::{Config, PriceMonitor};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("price_monitor=info".parse()?),
        )
        .init();

    info!("Starting Price Monitor");

    // Load configuration
    let config = Config::load()?;

    // Initialize storage
    let storage = Arc::new(SqliteStorage::new(&config.database.path).await?);
    storage.migrate().await?;

    let fetcher = build_fetcher(&config.browser, Site::TerabyteShop)?;
    let normalizer = Arc::new(GeminiClient::new(&config.llm)?);
    info!(
        "Browser mode: {:?}, LLM model: {} (API key loaded)",
        config.browser.mode, config.llm.model
    );

    let monitor = PriceMonitor::new(fetcher, normalizer, storage.clone());

    api::serve(&config.server, monitor, shutdown_signal()).await?;

    drop(storage);
    info!("SQLite connection closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
