#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use price_monitor::browser::HttpFetcher;
use price_monitor::config::LlmConfig;
use price_monitor::llm::GeminiClient;
use price_monitor::models::Site;
use price_monitor::storage::{SqliteStorage, Storage};
use price_monitor::utils::http::create_client;
use price_monitor::PriceMonitor;

pub const PRODUCT_PATH: &str = "/produto/24563/placa-de-video-xfx-rx-7600";

pub const PRODUCT_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>Terabyte</title></head>
<body>
  <h1 class="tit-prod">Placa de Video XFX Radeon RX 7600 8GB</h1>
  <div class="valores">
    <p id="valVista">R$ 1.899,90</p>
    <p id="valParc">12x de R$ 183,32 sem juros</p>
  </div>
  <div class="box-pagamento-loja">R$ 1.899,90 no PIX (15% de desconto) ou em até 12x sem juros</div>
  <div class="tecnicas"><p><strong>Marca:</strong><br>XFX</p><p><strong>Memory Size:</strong><br>8 GB</p></div>
</body>
</html>
"#;

pub fn gemini_answer(model_text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": model_text}]}
        }]
    })
}

pub async fn mount_product_page(server: &MockServer, page: &str) {
    Mock::given(method("GET"))
        .and(path(PRODUCT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(page.to_string()))
        .mount(server)
        .await;
}

pub async fn mount_gemini(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(body_string_contains("parcelas_sem_juros"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer(
            "```json\n{\"tipo_pagamento_principal\": \"pix\", \"desconto_a_vista_percentual\": 15, \"parcelas_sem_juros\": 12}\n```",
        )))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(body_string_contains("snake_case"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer(
            "{\"marca\": \"XFX\", \"memory_size_gb\": 8}",
        )))
        .mount(server)
        .await;
}

pub fn gemini_client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(&LlmConfig {
        api_key: "test-key".to_string(),
        model: "gemini-1.5-flash".to_string(),
        base_url: server.uri(),
        timeout_seconds: 5,
    })
    .unwrap()
}

pub async fn storage() -> Arc<SqliteStorage> {
    let storage = SqliteStorage::in_memory().await.unwrap();
    storage.migrate().await.unwrap();
    Arc::new(storage)
}

pub fn monitor(llm: &MockServer, storage: Arc<SqliteStorage>) -> PriceMonitor {
    let client = create_client("test-agent", Duration::from_secs(5)).unwrap();
    PriceMonitor::new(
        Arc::new(HttpFetcher::with_client(client, Site::TerabyteShop)),
        Arc::new(gemini_client(llm)),
        storage,
    )
}
