use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw fields read off a product page. Any selector that did not match is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedPage {
    pub product_name: Option<String>,
    pub price_cash_text: Option<String>,
    pub price_installment_text: Option<String>,
    pub technical_specs_html: Option<String>,
    pub payment_conditions_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub name: String,
    pub url: String,
}

/// Response body of a successful scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReport {
    pub message: String,
    pub product: ProductRef,
    pub price_cash: Option<f64>,
    pub price_installment: Option<f64>,
    pub normalized_conditions: Value,
    pub extracted_features: Value,
}

/// One observed price for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub price_cash: f64,
    pub price_installment: Option<f64>,
    pub conditions: Value,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub last_scraped_at: String,
    pub features: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub id: i64,
    pub product_id: i64,
    pub price_cash: f64,
    pub price_installment: Option<f64>,
    pub conditions: Value,
    pub scraped_at: String,
}
