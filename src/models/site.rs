use serde::{Deserialize, Serialize};

/// CSS selectors locating each field on a storefront's product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSelectors {
    pub product_name: &'static str,
    pub price_cash: &'static str,
    pub price_installment: &'static str,
    pub technical_specs: &'static str,
    pub payment_conditions: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    TerabyteShop,
}

impl Site {
    pub fn key(&self) -> &'static str {
        match self {
            Site::TerabyteShop => "terabyteshop",
        }
    }

    pub fn selectors(&self) -> SiteSelectors {
        match self {
            Site::TerabyteShop => SiteSelectors {
                product_name: "h1.tit-prod",
                price_cash: "#valVista",
                price_installment: "#valParc",
                technical_specs: ".tecnicas",
                payment_conditions: ".box-pagamento-loja",
            },
        }
    }
}
