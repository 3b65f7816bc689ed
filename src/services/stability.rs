//! Structure-guided backend: Stability AI structure control.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pixel_art::{flatten_onto, resize_nearest, RawImage};
use reqwest::blocking::multipart;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;

use super::codec;
use super::provider::{build_client, check_status, transport_error, PROVIDER_STABILITY};
use crate::error::ProviderError;
use crate::models::{ApiKey, StabilityConfig};

/// Map the user-facing "how much may change" strength onto the backend's
/// "how much structure to keep" control strength.
///
/// `strength` is clamped into `[0, 1]`; the result is in `[0.1, 1.0]`.
pub fn control_strength(strength: f32) -> f32 {
    (1.0 - strength.clamp(0.0, 1.0) + 0.3).clamp(0.1, 1.0)
}

/// Flatten transparency onto black and resize to `resolution` square.
pub fn prepare_guide(guide: &RawImage, resolution: u32) -> RawImage {
    let flat = flatten_onto(guide, [0, 0, 0]);
    if flat.width() == resolution && flat.height() == resolution {
        flat
    } else {
        resize_nearest(&flat, resolution, resolution)
    }
}

#[derive(Debug, Deserialize)]
struct StructureResponse {
    image: Option<String>,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StabilityProvider {
    base_url: String,
    model: String,
    resolution: u32,
    negative_prompt: String,
    default_strength: f32,
    timeout: Duration,
}

impl StabilityProvider {
    pub fn new(config: &StabilityConfig, timeout: Duration) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            resolution: config.resolution.max(1),
            negative_prompt: config.negative_prompt.clone(),
            default_strength: config.default_strength,
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Regenerate `guide` under `prompt`, keeping its structure.
    pub fn generate(
        &self,
        prompt: &str,
        api_key: &ApiKey,
        guide: &RawImage,
        strength: Option<f32>,
    ) -> Result<RawImage, ProviderError> {
        let client = build_client(PROVIDER_STABILITY, self.timeout)?;

        let prepared = prepare_guide(guide, self.resolution);
        let guide_png =
            codec::encode_png(&prepared, false).map_err(|source| ProviderError::Decode {
                provider: PROVIDER_STABILITY,
                source,
            })?;
        let control = control_strength(strength.unwrap_or(self.default_strength));

        tracing::info!(
            resolution = self.resolution,
            control_strength = control,
            "Requesting structure-guided image from Stability"
        );

        let image_part = multipart::Part::bytes(guide_png)
            .file_name("guide.png")
            .mime_str("image/png")
            .map_err(|e| transport_error(PROVIDER_STABILITY, e))?;
        let form = multipart::Form::new()
            .part("image", image_part)
            .text("prompt", prompt.to_string())
            .text("negative_prompt", self.negative_prompt.clone())
            .text("control_strength", format!("{control:.2}"))
            .text("output_format", "png");

        let response = client
            .post(format!("{}/v2beta/stable-image/control/structure", self.base_url))
            .bearer_auth(api_key.expose())
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .map_err(|e| transport_error(PROVIDER_STABILITY, e))?;
        let response = check_status(PROVIDER_STABILITY, response)?;

        let parsed: StructureResponse =
            response
                .json()
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: PROVIDER_STABILITY,
                    message: e.to_string(),
                })?;

        if parsed.finish_reason.as_deref() == Some("CONTENT_FILTERED") {
            return Err(ProviderError::InvalidResponse {
                provider: PROVIDER_STABILITY,
                message: "image was blocked by the content filter".to_string(),
            });
        }

        let encoded = parsed.image.ok_or_else(|| ProviderError::InvalidResponse {
            provider: PROVIDER_STABILITY,
            message: "response contained no image".to_string(),
        })?;
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ProviderError::Decode {
                provider: PROVIDER_STABILITY,
                source: e.into(),
            })?;

        codec::decode(&bytes).map_err(|source| ProviderError::Decode {
            provider: PROVIDER_STABILITY,
            source,
        })
    }
}
