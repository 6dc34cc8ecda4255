use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

use crate::browser::PageFetcher;
use crate::error::{Error, Result};
use crate::llm::Normalizer;
use crate::models::{
    PriceRecord, PriceSnapshot, ProductRecord, ProductRef, ScrapeReport, SCRAPE_SUCCESS_MESSAGE,
};
use crate::parsers::{parse_cash_price, parse_installment_price};
use crate::storage::Storage;

/// Scrape → normalize → persist, for one product URL at a time.
#[derive(Clone)]
pub struct PriceMonitor {
    fetcher: Arc<dyn PageFetcher>,
    normalizer: Arc<dyn Normalizer>,
    storage: Arc<dyn Storage>,
}

impl PriceMonitor {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        normalizer: Arc<dyn Normalizer>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            storage,
        }
    }

    #[instrument(skip(self))]
    pub async fn scrape_product(&self, product_url: &str) -> Result<ScrapeReport> {
        let url = validate_url(product_url)?;
        // Stored and echoed as the caller sent it; `Url` would re-serialize it.
        let product_url = product_url.trim();

        info!("Scraping {} ({})", url, self.fetcher.site().key());
        let page = self.fetcher.fetch(url.as_str()).await.map_err(Error::Fetch)?;

        let price_cash = page.price_cash_text.as_deref().and_then(parse_cash_price);
        let price_installment = page
            .price_installment_text
            .as_deref()
            .and_then(parse_installment_price);
        info!("Parsed prices: cash={:?} installment={:?}", price_cash, price_installment);

        let name = page.product_name.clone().ok_or_else(|| {
            warn!("Product name not found on {}", url);
            Error::IncompletePage("nome do produto")
        })?;
        let cash = price_cash.ok_or_else(|| {
            warn!("Cash price not found on {}", url);
            Error::IncompletePage("preço à vista")
        })?;

        let conditions = async {
            match page.payment_conditions_text.as_deref() {
                Some(text) => self.normalizer.normalize_conditions(text).await,
                None => Value::Null,
            }
        };
        let features = async {
            match page.technical_specs_html.as_deref() {
                Some(html) => self.normalizer.extract_features(html).await,
                None => Value::Null,
            }
        };
        let (normalized_conditions, extracted_features) = futures::join!(conditions, features);

        let snapshot = PriceSnapshot {
            price_cash: cash,
            price_installment,
            conditions: normalized_conditions.clone(),
            scraped_at: Utc::now(),
        };
        self.storage
            .save_scrape(&name, product_url, &extracted_features, &snapshot)
            .await
            .map_err(Error::Storage)?;

        Ok(ScrapeReport {
            message: SCRAPE_SUCCESS_MESSAGE.to_string(),
            product: ProductRef {
                name,
                url: product_url.to_string(),
            },
            price_cash,
            price_installment,
            normalized_conditions,
            extracted_features,
        })
    }

    pub async fn products(&self) -> Result<Vec<ProductRecord>> {
        self.storage.list_products().await.map_err(Error::Storage)
    }

    pub async fn price_history(&self, product_id: i64, limit: usize) -> Result<Vec<PriceRecord>> {
        if self
            .storage
            .get_product(product_id)
            .await
            .map_err(Error::Storage)?
            .is_none()
        {
            return Err(Error::ProductNotFound(product_id));
        }
        self.storage
            .price_history(product_id, limit)
            .await
            .map_err(Error::Storage)
    }
}

/// Accept only absolute http(s) URLs.
pub fn validate_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingUrl);
    }

    let url = Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(Error::InvalidUrl(trimmed.to_string())),
    }
}
