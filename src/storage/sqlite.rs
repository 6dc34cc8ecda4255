use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::SecondsFormat;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::models::{PriceRecord, PriceSnapshot, ProductRecord};
use crate::storage::Storage;

pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        if db_path != ":memory:" {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory {}", parent.display())
                    })?;
                }
            }
        }

        let conn = Connection::open(db_path)
            .context("Failed to open SQLite database")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        info!("Connected to SQLite database at {}", db_path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn in_memory() -> Result<Self> {
        Self::new(":memory:").await
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("SQLite connection mutex poisoned"))
    }
}

fn encode_json(value: &Value) -> Result<String> {
    serde_json::to_string(value).context("Failed to serialize JSON column")
}

fn decode_json(raw: Option<String>) -> Value {
    match raw {
        Some(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        None => Value::Null,
    }
}

fn upsert_product_on(conn: &Connection, name: &str, url: &str, features: &Value) -> Result<i64> {
    conn.execute(
        "INSERT INTO products (name, url, features) VALUES (?1, ?2, ?3)
         ON CONFLICT(url) DO UPDATE SET
            name = excluded.name,
            features = excluded.features,
            last_scraped_at = CURRENT_TIMESTAMP",
        params![name, url, encode_json(features)?],
    )
    .context("Failed to insert or update product")?;

    let id = conn
        .query_row("SELECT id FROM products WHERE url = ?1", params![url], |row| row.get(0))
        .context("Failed to look up product id after upsert")?;

    debug!("Upserted product {} ({})", id, url);
    Ok(id)
}

fn insert_price_on(conn: &Connection, product_id: i64, snapshot: &PriceSnapshot) -> Result<i64> {
    conn.execute(
        "INSERT INTO prices (product_id, price_cash, price_installment, conditions, scraped_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            product_id,
            snapshot.price_cash,
            snapshot.price_installment,
            encode_json(&snapshot.conditions)?,
            snapshot.scraped_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ],
    )
    .context("Failed to insert price")?;

    Ok(conn.last_insert_rowid())
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<ProductRecord> {
    Ok(ProductRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        last_scraped_at: row.get(3)?,
        features: decode_json(row.get(4)?),
    })
}

fn price_from_row(row: &Row<'_>) -> rusqlite::Result<PriceRecord> {
    Ok(PriceRecord {
        id: row.get(0)?,
        product_id: row.get(1)?,
        price_cash: row.get(2)?,
        price_installment: row.get(3)?,
        conditions: decode_json(row.get(4)?),
        scraped_at: row.get(5)?,
    })
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn migrate(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                url TEXT NOT NULL UNIQUE,
                last_scraped_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                features JSON
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS prices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER,
                price_cash REAL NOT NULL,
                price_installment REAL,
                conditions JSON,
                scraped_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_prices_product ON prices(product_id, scraped_at)",
            [],
        )?;

        info!("Database migration completed");
        Ok(())
    }

    async fn upsert_product(&self, name: &str, url: &str, features: &Value) -> Result<i64> {
        let conn = self.conn()?;
        upsert_product_on(&conn, name, url, features)
    }

    async fn insert_price(&self, product_id: i64, snapshot: &PriceSnapshot) -> Result<i64> {
        let conn = self.conn()?;
        insert_price_on(&conn, product_id, snapshot)
    }

    async fn save_scrape(
        &self,
        name: &str,
        url: &str,
        features: &Value,
        snapshot: &PriceSnapshot,
    ) -> Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let product_id = upsert_product_on(&tx, name, url, features)?;
        insert_price_on(&tx, product_id, snapshot)?;

        tx.commit().context("Failed to commit scrape")?;
        info!("Saved price snapshot for product {} ({})", product_id, url);
        Ok(product_id)
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, url, last_scraped_at, features
             FROM products ORDER BY last_scraped_at DESC, id DESC",
        )?;
        let products = stmt
            .query_map([], product_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<ProductRecord>> {
        let conn = self.conn()?;
        let product = conn
            .query_row(
                "SELECT id, name, url, last_scraped_at, features FROM products WHERE id = ?1",
                params![product_id],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    async fn price_history(&self, product_id: i64, limit: usize) -> Result<Vec<PriceRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, product_id, price_cash, price_installment, conditions, scraped_at
             FROM prices WHERE product_id = ?1
             ORDER BY scraped_at DESC, id DESC
             LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let prices = stmt
            .query_map(params![product_id, limit], price_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(prices)
    }
}
