use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{PriceRecord, ProductRecord, ScrapeReport};
use crate::service::PriceMonitor;

const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    #[serde(default)]
    product_url: Option<String>,
}

#[derive(Deserialize)]
pub struct HistoryParams {
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn scrape_product(
    State(monitor): State<PriceMonitor>,
    body: std::result::Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeReport>> {
    let product_url = match body {
        Ok(Json(request)) => request.product_url.unwrap_or_default(),
        Err(rejection) => {
            warn!("Rejected scrape request body: {}", rejection);
            String::new()
        }
    };

    info!("Scrape requested for {}", product_url);
    let report = monitor.scrape_product(&product_url).await?;
    Ok(Json(report))
}

pub async fn list_products(State(monitor): State<PriceMonitor>) -> Result<Json<Vec<ProductRecord>>> {
    Ok(Json(monitor.products().await?))
}

pub async fn price_history(
    State(monitor): State<PriceMonitor>,
    Path(product_id): Path<i64>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<PriceRecord>>> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(Json(monitor.price_history(product_id, limit).await?))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
