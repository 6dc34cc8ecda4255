use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::browser::{extract_from_html, PageFetcher};
use crate::config::BrowserConfig;
use crate::models::{ScrapedPage, Site};
use crate::utils::http::{create_client, fetch_with_retry};

/// Fetches the server-rendered HTML without running page scripts.
pub struct HttpFetcher {
    client: Client,
    site: Site,
}

impl HttpFetcher {
    pub fn new(config: &BrowserConfig, site: Site) -> Result<Self> {
        let client = create_client(&config.user_agent, config.navigation_timeout())?;
        Ok(Self::with_client(client, site))
    }

    pub fn with_client(client: Client, site: Site) -> Self {
        Self { client, site }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<ScrapedPage> {
        info!("Fetching {} over plain HTTP", url);

        let response = fetch_with_retry(&self.client, url, 3).await?;
        let html = response.text().await?;

        Ok(extract_from_html(&html, &self.site.selectors()))
    }

    fn site(&self) -> Site {
        self.site
    }
}
