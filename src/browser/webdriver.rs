use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::browser::PageFetcher;
use crate::config::BrowserConfig;
use crate::models::{ScrapedPage, Site, SiteSelectors};
use crate::parsers::{non_empty, normalize_text};

/// Drives a real Chrome through a WebDriver server so that script-rendered
/// prices are present before extraction.
pub struct WebDriverFetcher {
    config: BrowserConfig,
    site: Site,
}

impl WebDriverFetcher {
    pub fn new(config: BrowserConfig, site: Site) -> Self {
        Self { config, site }
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut args = vec![
            format!("--user-agent={}", self.config.user_agent),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
        ];
        if self.config.headless {
            args.push("--headless=new".to_string());
        }

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }

    async fn connect(&self) -> Result<Client> {
        info!("Connecting to WebDriver at {}", self.config.webdriver_url);
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        builder
            .connect(&self.config.webdriver_url)
            .await
            .with_context(|| format!("Failed to connect to WebDriver at {}", self.config.webdriver_url))
    }

    async fn scrape_session(&self, client: &Client, url: &str) -> Result<ScrapedPage> {
        tokio::time::timeout(self.config.navigation_timeout(), client.goto(url))
            .await
            .with_context(|| format!("Navigation to {} timed out", url))?
            .with_context(|| format!("Failed to navigate to {}", url))?;

        let selectors = self.site.selectors();
        self.wait_for_prices(client, &selectors).await;

        let page = ScrapedPage {
            product_name: read_text(client, selectors.product_name).await,
            price_cash_text: read_text(client, selectors.price_cash).await,
            price_installment_text: read_text(client, selectors.price_installment).await,
            technical_specs_html: read_inner_html(client, selectors.technical_specs).await,
            payment_conditions_text: read_text(client, selectors.payment_conditions).await,
        };

        info!("Cash price text ({}): {:?}", selectors.price_cash, page.price_cash_text);
        info!(
            "Installment price text ({}): {:?}",
            selectors.price_installment, page.price_installment_text
        );

        Ok(page)
    }

    /// Prices are rendered by page scripts; a timeout here is not fatal.
    async fn wait_for_prices(&self, client: &Client, selectors: &SiteSelectors) {
        let timeout = self.config.selector_timeout();
        for selector in [selectors.price_cash, selectors.price_installment] {
            if let Err(e) = client
                .wait()
                .at_most(timeout)
                .for_element(Locator::Css(selector))
                .await
            {
                warn!(
                    "Timed out waiting for price selector {}, extracting anyway: {}",
                    selector, e
                );
                return;
            }
        }
        info!("Price selectors found");
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, url: &str) -> Result<ScrapedPage> {
        let client = self.connect().await?;
        let result = self.scrape_session(&client, url).await;

        if let Err(e) = client.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        result
    }

    fn site(&self) -> Site {
        self.site
    }
}

async fn read_text(client: &Client, selector: &str) -> Option<String> {
    match client.find(Locator::Css(selector)).await {
        Ok(element) => match element.text().await {
            Ok(text) => normalize_text(&text),
            Err(e) => {
                debug!("Could not read text of {}: {}", selector, e);
                None
            }
        },
        Err(e) => {
            debug!("Element {} not found: {}", selector, e);
            None
        }
    }
}

async fn read_inner_html(client: &Client, selector: &str) -> Option<String> {
    match client.find(Locator::Css(selector)).await {
        Ok(element) => match element.html(true).await {
            Ok(html) => non_empty(&html),
            Err(e) => {
                debug!("Could not read HTML of {}: {}", selector, e);
                None
            }
        },
        Err(e) => {
            debug!("Element {} not found: {}", selector, e);
            None
        }
    }
}
