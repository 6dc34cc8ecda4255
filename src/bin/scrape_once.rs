//! Scrape a single product URL from the command line and print the report.
//!
//! Usage: scrape_once <product-url>

use anyhow::{bail, Result};
use std::sync::Arc;

use price_monitor::browser::build_fetcher;
use price_monitor::llm::GeminiClient;
use price_monitor::models::Site;
use price_monitor::storage::{SqliteStorage, Storage};
use price_monitor::{Config, PriceMonitor};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("price_monitor=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(product_url) = std::env::args().nth(1) else {
        bail!("usage: scrape_once <product-url>");
    };

    let config = Config::load()?;
    let storage = Arc::new(SqliteStorage::new(&config.database.path).await?);
    storage.migrate().await?;

    let monitor = PriceMonitor::new(
        build_fetcher(&config.browser, Site::TerabyteShop)?,
        Arc::new(GeminiClient::new(&config.llm)?),
        storage,
    );

    let report = monitor.scrape_product(&product_url).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
