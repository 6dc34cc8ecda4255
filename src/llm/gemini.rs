use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::config::LlmConfig;
use crate::llm::Normalizer;

/// Google Generative Language API client
pub struct GeminiClient {
    api_key: String,
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            api_key: config.api_key.clone(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Normalizer for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .context("Gemini request failed")?;

        let latency = start.elapsed().as_millis();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Gemini API error {status}: {body}");
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to decode Gemini response")?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            bail!("Gemini returned an empty answer");
        }

        info!("Gemini response from {}: {} chars, {}ms latency", self.model, text.len(), latency);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(&LlmConfig {
            api_key: "test-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            base_url: server.uri(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn sends_prompt_and_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "olá"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "{\"ok\": true}"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).generate("olá").await.unwrap();
        assert_eq!(text, "{\"ok\": true}");
    }

    #[tokio::test]
    async fn api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("x").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn empty_candidates_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        assert!(client_for(&server).generate("x").await.is_err());
    }

    #[tokio::test]
    async fn connection_error_does_not_leak_api_key() {
        let client = GeminiClient::new(&LlmConfig {
            api_key: "secret-key-123".to_string(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 5,
        })
        .unwrap();

        let err = client.generate("x").await.unwrap_err();
        let rendered = format!("{:#} {:?}", err, err);
        assert!(!rendered.contains("secret-key-123"), "{}", rendered);
    }
}
