pub mod price;

pub use price::*;

use html_escape::decode_html_entities;

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `None` for empty or whitespace-only text, trimmed text otherwise.
pub fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Page text as handed to the parsers and the LLM: entities decoded,
/// whitespace collapsed, `None` when nothing is left.
pub fn normalize_text(text: &str) -> Option<String> {
    non_empty(&clean_text(text))
}
