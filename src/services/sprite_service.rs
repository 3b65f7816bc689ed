//! Request orchestration: validate, generate, pixelate, encode.

use pixel_art::{PixelArtProcessor, Sprite};
use std::sync::Arc;
use std::time::Instant;

use super::codec;
use super::debug_snapshot::DebugSnapshots;
use super::provider::{GenerationInput, ProviderSet};
use crate::error::ApiError;
use crate::models::{ApiKey, AppConfig, GenerateRequest, GenerationRequest, ProviderKind};

/// Largest palette the editor accepts.
pub const MAX_COLORS: u32 = 256;

/// A finished sprite ready for the JSON response.
#[derive(Debug, Clone)]
pub struct GeneratedSprite {
    pub base64: String,
    pub width: u32,
    pub height: u32,
    /// Wall-clock seconds for the whole request
    pub generation_time: f64,
}

/// Turns generation requests into encoded sprites.
///
/// All methods block on network I/O; call them from `spawn_blocking`.
pub struct SpriteService {
    config: Arc<AppConfig>,
    providers: ProviderSet,
    snapshots: Option<DebugSnapshots>,
}

impl SpriteService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let providers = ProviderSet::from_config(&config);
        let snapshots = config.debug_dir.clone().map(DebugSnapshots::new);
        if let Some(snapshots) = &snapshots {
            tracing::info!(dir = %snapshots.dir().display(), "Debug snapshots enabled");
        }
        Self {
            config,
            providers,
            snapshots,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Run a request end to end and return the base64 PNG sprite.
    pub fn generate(&self, body: GenerateRequest) -> Result<GeneratedSprite, ApiError> {
        let start = Instant::now();
        let request = self.validate(body)?;
        let sprite = self.generate_sprite(&request)?;
        let base64 = codec::encode_base64(sprite.as_image(), self.config.optimize_png)?;
        let generation_time = start.elapsed().as_secs_f64();

        tracing::info!(
            provider = %request.provider,
            width = sprite.width(),
            height = sprite.height(),
            colors = sprite.distinct_rgb_count(),
            generation_time,
            "Sprite generated"
        );

        Ok(GeneratedSprite {
            base64,
            width: sprite.width(),
            height: sprite.height(),
            generation_time,
        })
    }

    /// Call the backend and pixelate its image.
    pub fn generate_sprite(&self, request: &GenerationRequest) -> Result<Sprite, ApiError> {
        let provider = self.providers.get(request.provider);
        let input = GenerationInput {
            prompt: &request.prompt,
            api_key: &request.credentials,
            guide: request.guide.as_ref(),
            strength: request.strength,
        };

        let raw = provider.generate(&input)?;
        tracing::debug!(
            width = raw.width(),
            height = raw.height(),
            alpha = raw.has_alpha(),
            "Received raw image"
        );

        let stamp = DebugSnapshots::stamp();
        if let Some(snapshots) = &self.snapshots {
            snapshots.save(&stamp, "raw", &raw);
        }

        let sprite = PixelArtProcessor::new(request.width, request.height)
            .colors(request.colors)
            .process(&raw)?;

        if let Some(snapshots) = &self.snapshots {
            snapshots.save(&stamp, "sprite", sprite.as_image());
        }
        Ok(sprite)
    }

    /// Check a request and resolve defaults. Never touches the network.
    pub fn validate(&self, body: GenerateRequest) -> Result<GenerationRequest, ApiError> {
        let prompt = body
            .prompt
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::Validation("No prompt provided".to_string()))?;

        let provider = ProviderKind::from_selector(body.ai_provider.as_deref())
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let credentials = body
            .api_key
            .and_then(ApiKey::new)
            .or_else(|| self.configured_key(provider).cloned())
            .ok_or_else(|| {
                ApiError::MissingCredentials(format!(
                    "No {} API Key provided. Please enter it in the extension settings or set {}.",
                    provider.display_name(),
                    key_env_var(provider)
                ))
            })?;

        let defaults = self.config.defaults;
        let max_size = self.config.max_sprite_size;
        let width = dimension("pixel_width", body.pixel_width, defaults.width, max_size)?;
        let height = dimension("pixel_height", body.pixel_height, defaults.height, max_size)?;
        let colors = match body.colors {
            None => defaults.colors.min(MAX_COLORS),
            Some(c) if (0..=MAX_COLORS as i64).contains(&c) => c as u32,
            Some(c) => {
                return Err(ApiError::Validation(format!(
                    "colors must be between 0 and {MAX_COLORS}, got {c}"
                )))
            }
        };

        let strength = body.strength.map(|s| {
            let clamped = s.clamp(0.0, 1.0);
            if clamped != s {
                tracing::debug!(strength = s, clamped, "Clamped strength into [0, 1]");
            }
            clamped
        });

        let guide = body
            .init_image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|encoded| match codec::decode_base64(encoded) {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not decode init_image, ignoring it");
                    None
                }
            });

        if provider == ProviderKind::StructureGuided && guide.is_none() {
            return Err(ApiError::Validation(
                "Structure-guided generation requires a valid init_image".to_string(),
            ));
        }

        Ok(GenerationRequest {
            prompt,
            provider,
            credentials,
            guide,
            strength,
            width,
            height,
            colors,
        })
    }

    fn configured_key(&self, provider: ProviderKind) -> Option<&ApiKey> {
        let key = match provider {
            ProviderKind::TextToImage => self.config.openai.api_key.as_ref(),
            ProviderKind::StructureGuided => self.config.stability.api_key.as_ref(),
        };
        // A blank `api_key:` in the config file counts as unset
        key.filter(|k| !k.expose().trim().is_empty())
    }
}

fn key_env_var(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::TextToImage => "OPENAI_API_KEY",
        ProviderKind::StructureGuided => "STABILITY_API_KEY",
    }
}

fn dimension(field: &str, value: Option<i64>, default: u32, max: u32) -> Result<u32, ApiError> {
    match value {
        None => Ok(default.clamp(1, max.max(1))),
        Some(v) if v >= 1 && v <= max as i64 => Ok(v as u32),
        Some(v) => Err(ApiError::Validation(format!(
            "{field} must be between 1 and {max}, got {v}"
        ))),
    }
}
