//! Dispatch to the image generation backends.

use pixel_art::RawImage;
use reqwest::blocking::{Client, Response};
use std::time::Duration;

use super::openai::OpenAiProvider;
use super::stability::StabilityProvider;
use crate::error::ProviderError;
use crate::models::{AppConfig, ApiKey, ProviderKind};

pub(crate) const PROVIDER_OPENAI: &str = "OpenAI";
pub(crate) const PROVIDER_STABILITY: &str = "Stability";

/// Everything a backend needs to produce one image.
#[derive(Debug, Clone, Copy)]
pub struct GenerationInput<'a> {
    pub prompt: &'a str,
    pub api_key: &'a ApiKey,
    pub guide: Option<&'a RawImage>,
    pub strength: Option<f32>,
}

/// An image generation backend.
#[derive(Debug, Clone)]
pub enum Provider {
    TextToImage(OpenAiProvider),
    StructureGuided(StabilityProvider),
}

impl Provider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::TextToImage(_) => ProviderKind::TextToImage,
            Provider::StructureGuided(_) => ProviderKind::StructureGuided,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::TextToImage(p) => p.model(),
            Provider::StructureGuided(p) => p.model(),
        }
    }

    /// Produce one raw image. Blocks until the backend answers or times out.
    pub fn generate(&self, input: &GenerationInput<'_>) -> Result<RawImage, ProviderError> {
        match self {
            Provider::TextToImage(openai) => {
                if input.guide.is_some() {
                    tracing::debug!("Ignoring guide image for text-to-image provider");
                }
                openai.generate(input.prompt, input.api_key)
            }
            Provider::StructureGuided(stability) => {
                let guide = input.guide.ok_or(ProviderError::MissingGuide {
                    provider: PROVIDER_STABILITY,
                })?;
                stability.generate(input.prompt, input.api_key, guide, input.strength)
            }
        }
    }
}

/// One configured backend per [`ProviderKind`].
#[derive(Debug, Clone)]
pub struct ProviderSet {
    text_to_image: Provider,
    structure_guided: Provider,
}

impl ProviderSet {
    pub fn from_config(config: &AppConfig) -> Self {
        let timeout = config.request_timeout();
        Self {
            text_to_image: Provider::TextToImage(OpenAiProvider::new(&config.openai, timeout)),
            structure_guided: Provider::StructureGuided(StabilityProvider::new(
                &config.stability,
                timeout,
            )),
        }
    }

    pub fn get(&self, kind: ProviderKind) -> &Provider {
        match kind {
            ProviderKind::TextToImage => &self.text_to_image,
            ProviderKind::StructureGuided => &self.structure_guided,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        [&self.text_to_image, &self.structure_guided].into_iter()
    }
}

/// Blocking client with the request timeout applied. Built per request,
/// always from a blocking context.
pub(crate) fn build_client(
    provider: &'static str,
    timeout: Duration,
) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("pixelai/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| transport_error(provider, e))
}

pub(crate) fn transport_error(provider: &'static str, error: reqwest::Error) -> ProviderError {
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };
    ProviderError::Transport { provider, message }
}

/// Turn non-2xx responses into [`ProviderError::Http`].
pub(crate) fn check_status(
    provider: &'static str,
    response: Response,
) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = upstream_error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::warn!(provider, status = status.as_u16(), %message, "Upstream returned an error");

    Err(ProviderError::Http {
        provider,
        status: status.as_u16(),
        message,
    })
}

/// Pull a human-readable message out of an upstream JSON error body.
///
/// Understands `{"error": {"message": ..}}` (OpenAI),
/// `{"errors": [..]}` / `{"message": ..}` / `{"name": ..}` (Stability), and
/// falls back to the raw body text.
fn upstream_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return Some(trimmed.chars().take(500).collect());
    };

    if let Some(message) = json.pointer("/error/message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }
    if let Some(errors) = json.get("errors").and_then(|v| v.as_array()) {
        let joined: Vec<&str> = errors.iter().filter_map(|e| e.as_str()).collect();
        if !joined.is_empty() {
            return Some(joined.join("; "));
        }
    }
    for key in ["message", "error", "name"] {
        if let Some(message) = json.get(key).and_then(|v| v.as_str()) {
            return Some(message.to_string());
        }
    }
    Some(trimmed.chars().take(500).collect())
}
