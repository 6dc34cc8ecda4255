use once_cell::sync::Lazy;
use regex::Regex;

static INSTALLMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"R\$\s*([\d.,]+)").expect("Invalid installment regex")
});

static LEADING_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:\d+(?:\.\d*)?|\.\d+)").expect("Invalid number regex")
});

/// Convert a Brazilian-formatted amount ("1.299,90") to a float.
///
/// Thousands dots are dropped and the decimal comma becomes a dot. Only the
/// leading numeric part is read, so trailing words ("à vista") are ignored.
pub fn parse_brl_amount(text: &str) -> Option<f64> {
    let normalized = text.replace('.', "").replace(',', ".");
    let normalized = normalized.trim();

    LEADING_NUMBER_REGEX
        .find(normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Parse the cash ("à vista") price text, e.g. "R$ 1.299,90".
pub fn parse_cash_price(text: &str) -> Option<f64> {
    parse_brl_amount(&text.replacen("R$", "", 1))
}

/// Parse the installment price text, e.g. "12x de R$ 125,00 sem juros".
///
/// The first amount following "R$" is taken; text without one yields `None`.
pub fn parse_installment_price(text: &str) -> Option<f64> {
    INSTALLMENT_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_brl_amount(m.as_str()))
}
