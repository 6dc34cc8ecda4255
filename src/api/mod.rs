//! HTTP surface: the scrape endpoint, read-only history endpoints and an
//! optional static front end.

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::future::Future;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::Error;
use crate::service::PriceMonitor;

mod handlers;

pub fn router(monitor: PriceMonitor, static_dir: Option<&str>) -> Router {
    let app = Router::new()
        .route("/api/scrape-product", post(handlers::scrape_product))
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/:id/prices", get(handlers::price_history))
        .route("/api/health", get(handlers::health))
        .with_state(monitor);

    let app = match static_dir {
        Some(dir) => {
            info!("Serving front end from {}", dir);
            let index = Path::new(dir).join("index.html");
            app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => app,
    };

    app.layer(CorsLayer::permissive())
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve<F>(config: &ServerConfig, monitor: PriceMonitor, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(monitor, config.static_dir.as_deref());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;
    Ok(())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::MissingUrl | Error::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Error::IncompletePage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ProductNotFound(_) => StatusCode::NOT_FOUND,
            Error::Fetch(_) | Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
