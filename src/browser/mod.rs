use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{BrowserConfig, BrowserMode};
use crate::models::{ScrapedPage, Site};

mod extract;
mod http;
mod webdriver;

pub use extract::extract_from_html;
pub use http::HttpFetcher;
pub use webdriver::WebDriverFetcher;

/// Loads one product page and reads the site's selector fields from it.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ScrapedPage>;
    fn site(&self) -> Site;
}

pub fn build_fetcher(config: &BrowserConfig, site: Site) -> Result<Arc<dyn PageFetcher>> {
    let fetcher: Arc<dyn PageFetcher> = match config.mode {
        BrowserMode::WebDriver => Arc::new(WebDriverFetcher::new(config.clone(), site)),
        BrowserMode::Http => Arc::new(HttpFetcher::new(config, site)?),
    };
    Ok(fetcher)
}
