use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::{PriceRecord, PriceSnapshot, ProductRecord};

mod sqlite;
pub use sqlite::SqliteStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn migrate(&self) -> Result<()>;

    /// Insert the product, or refresh name, features and `last_scraped_at`
    /// when the URL is already known. Returns the product id either way.
    async fn upsert_product(&self, name: &str, url: &str, features: &Value) -> Result<i64>;

    async fn insert_price(&self, product_id: i64, snapshot: &PriceSnapshot) -> Result<i64>;

    /// Upsert the product and append the price snapshot atomically.
    async fn save_scrape(
        &self,
        name: &str,
        url: &str,
        features: &Value,
        snapshot: &PriceSnapshot,
    ) -> Result<i64>;

    async fn list_products(&self) -> Result<Vec<ProductRecord>>;
    async fn get_product(&self, product_id: i64) -> Result<Option<ProductRecord>>;

    /// Newest first.
    async fn price_history(&self, product_id: i64, limit: usize) -> Result<Vec<PriceRecord>>;
}
