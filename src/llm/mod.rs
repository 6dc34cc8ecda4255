//! LLM normalization of free-form page fragments into JSON.
//!
//! Failures never propagate: callers always get a JSON value back, either
//! the model's object or `{"error": ...}`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{error, warn};

mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

pub const CONDITIONS_FALLBACK: &str = "Falha na análise Gemini de condições.";
pub const FEATURES_FALLBACK: &str = "Falha na análise Gemini de características.";

static CODE_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```json\n?|\n?```").expect("Invalid code fence regex")
});

static TRAILING_COMMA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",(\s*[}\]])").expect("Invalid trailing comma regex")
});

#[async_trait]
pub trait Normalizer: Send + Sync {
    /// Send one prompt and return the model's raw text answer.
    async fn generate(&self, prompt: &str) -> Result<String>;

    async fn normalize_conditions(&self, conditions_text: &str) -> Value {
        let prompt = prompts::conditions_prompt(conditions_text);
        match self.generate_json(&prompt).await {
            Ok(value) => value,
            Err(e) => {
                error!("Payment conditions analysis failed: {:#}", e);
                fallback(CONDITIONS_FALLBACK)
            }
        }
    }

    async fn extract_features(&self, specs_html: &str) -> Value {
        let prompt = prompts::features_prompt(specs_html);
        match self.generate_json(&prompt).await {
            Ok(value) => value,
            Err(e) => {
                error!("Technical features analysis failed: {:#}", e);
                fallback(FEATURES_FALLBACK)
            }
        }
    }

    async fn generate_json(&self, prompt: &str) -> Result<Value> {
        let text = self.generate(prompt).await?;
        parse_model_json(&text)
    }
}

pub fn fallback(message: &str) -> Value {
    json!({ "error": message })
}

/// Parse a model answer as JSON, tolerating markdown fences and trailing commas.
pub fn parse_model_json(text: &str) -> Result<Value> {
    let stripped = CODE_FENCE_REGEX.replace_all(text, "");
    let stripped = stripped.trim();

    match serde_json::from_str(stripped) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("Model answer is not valid JSON ({}), attempting repair", e);
            let repaired = TRAILING_COMMA_REGEX.replace_all(stripped, "$1");
            serde_json::from_str(&repaired)
                .with_context(|| format!("Model answer is not valid JSON: {}", snippet(stripped)))
        }
    }
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
