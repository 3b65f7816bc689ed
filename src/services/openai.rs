//! Text-to-image backend: OpenAI images API (DALL-E 3).

use pixel_art::RawImage;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::codec;
use super::provider::{build_client, check_status, transport_error, PROVIDER_OPENAI};
use crate::error::ProviderError;
use crate::models::{ApiKey, OpenAiConfig};

const STYLE_PREFIX: &str = "Pixel art style, ";
const STYLE_SUFFIX: &str = ", authentic retro game sprite, clean pixel art, flat colors";

/// Steer a free-form prompt towards pixel-art output.
pub fn enhance_prompt(prompt: &str) -> String {
    if prompt.to_lowercase().contains("pixel art") {
        format!("{STYLE_PREFIX}{prompt}")
    } else {
        format!("{STYLE_PREFIX}{prompt}{STYLE_SUFFIX}")
    }
}

#[derive(Debug, Serialize)]
struct ImageGenerationBody<'a> {
    model: &'a str,
    prompt: String,
    size: &'a str,
    quality: &'a str,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
    b64_json: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    base_url: String,
    model: String,
    size: String,
    quality: String,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig, timeout: Duration) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            size: config.size.clone(),
            quality: config.quality.clone(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate one square image and download it.
    pub fn generate(&self, prompt: &str, api_key: &ApiKey) -> Result<RawImage, ProviderError> {
        let client = build_client(PROVIDER_OPENAI, self.timeout)?;
        let body = ImageGenerationBody {
            model: &self.model,
            prompt: enhance_prompt(prompt),
            size: &self.size,
            quality: &self.quality,
            n: 1,
        };

        tracing::info!(model = %self.model, size = %self.size, "Requesting image from OpenAI");
        tracing::debug!(prompt = %body.prompt, "Enhanced prompt");

        let response = client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(api_key.expose())
            .json(&body)
            .send()
            .map_err(|e| transport_error(PROVIDER_OPENAI, e))?;
        let response = check_status(PROVIDER_OPENAI, response)?;

        let parsed: ImageGenerationResponse =
            response
                .json()
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: PROVIDER_OPENAI,
                    message: e.to_string(),
                })?;

        let image = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: PROVIDER_OPENAI,
                message: "response contained no images".to_string(),
            })?;

        let bytes = match (image.url, image.b64_json) {
            (Some(url), _) => self.download(&client, &url)?,
            (None, Some(b64)) => {
                return codec::decode_base64(&b64).map_err(|source| ProviderError::Decode {
                    provider: PROVIDER_OPENAI,
                    source,
                })
            }
            (None, None) => {
                return Err(ProviderError::InvalidResponse {
                    provider: PROVIDER_OPENAI,
                    message: "image entry has neither url nor b64_json".to_string(),
                })
            }
        };

        codec::decode(&bytes).map_err(|source| ProviderError::Decode {
            provider: PROVIDER_OPENAI,
            source,
        })
    }

    fn download(&self, client: &Client, url: &str) -> Result<Vec<u8>, ProviderError> {
        tracing::debug!("Downloading generated image");
        let response = client
            .get(url)
            .send()
            .map_err(|e| transport_error(PROVIDER_OPENAI, e))?;
        let response = check_status(PROVIDER_OPENAI, response)?;
        let bytes = response
            .bytes()
            .map_err(|e| transport_error(PROVIDER_OPENAI, e))?;
        tracing::debug!(bytes = bytes.len(), "Downloaded generated image");
        Ok(bytes.to_vec())
    }
}
