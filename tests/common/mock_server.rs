//! Mock OpenAI and Stability backends.

use pixel_art::RawImage;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{bearer_token, header, method, path},
    Match, Mock, MockServer, Request, ResponseTemplate,
};

use pixelai::models::{ApiKey, AppConfig};

use super::fixtures::{keys, png_base64, png_bytes};

pub const OPENAI_GENERATIONS: &str = "/v1/images/generations";
pub const OPENAI_IMAGE: &str = "/files/generated.png";
pub const STABILITY_STRUCTURE: &str = "/v2beta/stable-image/control/structure";

/// Matches requests whose raw body contains `needle`. Works on binary
/// (multipart) bodies.
pub struct BodyContainsBytes(pub Vec<u8>);

impl Match for BodyContainsBytes {
    fn matches(&self, request: &Request) -> bool {
        request
            .body
            .windows(self.0.len())
            .any(|window| window == self.0.as_slice())
    }
}

/// One wiremock server standing in for both backends
pub struct MockBackends {
    pub server: MockServer,
}

impl MockBackends {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Configuration pointing both backends at this server, without keys
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.openai.base_url = self.url();
        config.stability.base_url = self.url();
        config.request_timeout_secs = 5;
        config
    }

    /// Like [`MockBackends::config`] with server-side keys for both backends
    pub fn config_with_keys(&self) -> AppConfig {
        let mut config = self.config();
        config.openai.api_key = ApiKey::new(keys::OPENAI);
        config.stability.api_key = ApiKey::new(keys::STABILITY);
        config
    }

    /// OpenAI returns a URL on this server, which serves `image` as PNG
    pub async fn mock_openai(&self, image: &RawImage) {
        Mock::given(method("POST"))
            .and(path(OPENAI_GENERATIONS))
            .and(bearer_token(keys::OPENAI))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1700000000,
                "data": [{
                    "url": format!("{}{}", self.url(), OPENAI_IMAGE),
                    "revised_prompt": "pixel art"
                }]
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(OPENAI_IMAGE))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(png_bytes(image))
                    .insert_header("content-type", "image/png"),
            )
            .mount(&self.server)
            .await;
    }

    /// OpenAI answers with inline `b64_json` instead of a URL
    pub async fn mock_openai_inline(&self, image: &RawImage) {
        Mock::given(method("POST"))
            .and(path(OPENAI_GENERATIONS))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1700000000,
                "data": [{ "b64_json": png_base64(image) }]
            })))
            .mount(&self.server)
            .await;
    }

    /// OpenAI generation endpoint fails with an OpenAI-style error body
    pub async fn mock_openai_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(OPENAI_GENERATIONS))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "message": message,
                    "type": "invalid_request_error",
                    "code": null
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// OpenAI answers only after `delay`
    pub async fn mock_openai_slow(&self, image: &RawImage, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(OPENAI_GENERATIONS))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "data": [{ "b64_json": png_base64(image) }]
                    }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Stability structure endpoint returns `image` as base64 JSON
    pub async fn mock_stability(&self, image: &RawImage) {
        Mock::given(method("POST"))
            .and(path(STABILITY_STRUCTURE))
            .and(bearer_token(keys::STABILITY))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "image": png_base64(image),
                "finish_reason": "SUCCESS",
                "seed": 42
            })))
            .mount(&self.server)
            .await;
    }

    /// Stability structure endpoint fails with a Stability-style error body
    pub async fn mock_stability_error(&self, status: u16, errors: &[&str]) {
        Mock::given(method("POST"))
            .and(path(STABILITY_STRUCTURE))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "id": "a1b2c3",
                "name": "bad_request",
                "errors": errors
            })))
            .mount(&self.server)
            .await;
    }

    /// Stability reports the result was filtered
    pub async fn mock_stability_filtered(&self, image: &RawImage) {
        Mock::given(method("POST"))
            .and(path(STABILITY_STRUCTURE))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "image": png_base64(image),
                "finish_reason": "CONTENT_FILTERED",
                "seed": 7
            })))
            .mount(&self.server)
            .await;
    }

    /// All requests the server has seen so far
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests received on `endpoint`
    pub async fn requests_to(&self, endpoint: &str) -> Vec<Request> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == endpoint)
            .collect()
    }
}
