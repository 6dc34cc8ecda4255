use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::models::{ScrapedPage, SiteSelectors};
use crate::parsers::{non_empty, normalize_text};

/// Read every selector field from a static HTML document.
pub fn extract_from_html(html: &str, selectors: &SiteSelectors) -> ScrapedPage {
    let document = Html::parse_document(html);

    ScrapedPage {
        product_name: select_text(&document, selectors.product_name),
        price_cash_text: select_text(&document, selectors.price_cash),
        price_installment_text: select_text(&document, selectors.price_installment),
        technical_specs_html: select_first(&document, selectors.technical_specs)
            .and_then(|el| non_empty(&el.inner_html())),
        payment_conditions_text: select_text(&document, selectors.payment_conditions),
    }
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(parsed) => document.select(&parsed).next(),
        Err(_) => {
            warn!("Invalid selector: {}", selector);
            None
        }
    }
}

fn select_text(document: &Html, selector: &str) -> Option<String> {
    select_first(document, selector).and_then(|el| normalize_text(&el.text().collect::<String>()))
}
