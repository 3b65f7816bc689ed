use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::ApiKey;

/// Application configuration loaded from an optional YAML file, then
/// overridden from the environment.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    pub bind_addr: String,

    /// Timeout for every upstream HTTP request, in seconds
    pub request_timeout_secs: u64,

    /// Sprite parameters used when a request omits them
    pub defaults: SpriteDefaults,

    /// Largest accepted sprite width or height
    pub max_sprite_size: u32,

    /// Largest accepted request body in bytes (guide images are inlined)
    pub max_body_bytes: usize,

    /// Re-compress sprites with oxipng before base64 encoding
    pub optimize_png: bool,

    /// Write raw and final images here for debugging (disabled when unset)
    pub debug_dir: Option<PathBuf>,

    pub openai: OpenAiConfig,

    pub stability: StabilityConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct SpriteDefaults {
    pub width: u32,
    pub height: u32,
    pub colors: u32,
}

/// Text-to-image backend (OpenAI images API)
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub size: String,
    pub quality: String,
    pub api_key: Option<ApiKey>,
}

/// Structure-guided backend (Stability AI structure control)
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StabilityConfig {
    pub base_url: String,
    pub model: String,
    /// Guide images are resized to `resolution x resolution`
    pub resolution: u32,
    pub negative_prompt: String,
    /// Strength used when a request does not send one
    pub default_strength: f32,
    pub api_key: Option<ApiKey>,
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "blurry, smooth, anti-aliased, gradient, photorealistic, 3d render, soft edges, noise";

impl AppConfig {
    /// Load from `CONFIG_FILE` (if set) and apply environment overrides.
    pub fn from_env() -> Self {
        let file = std::env::var_os("CONFIG_FILE").map(PathBuf::from);
        Self::load(file.as_deref()).with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Load configuration from a YAML file, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply overrides from environment-style variables.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(addr) = non_empty("BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(key) = lookup("OPENAI_API_KEY").and_then(ApiKey::new) {
            self.openai.api_key = Some(key);
        }
        if let Some(key) = lookup("STABILITY_API_KEY").and_then(ApiKey::new) {
            self.stability.api_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Some(url) = non_empty("STABILITY_BASE_URL") {
            self.stability.base_url = url;
        }
        if let Some(dir) = non_empty("PIXELAI_DEBUG_DIR") {
            self.debug_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            request_timeout_secs: 60,
            defaults: SpriteDefaults::default(),
            max_sprite_size: 512,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            optimize_png: false,
            debug_dir: None,
            openai: OpenAiConfig::default(),
            stability: StabilityConfig::default(),
        }
    }
}

impl Default for SpriteDefaults {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            colors: 16,
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            api_key: None,
        }
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.stability.ai".to_string(),
            model: "stable-image-control-structure".to_string(),
            resolution: 1024,
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            default_strength: 0.5,
            api_key: None,
        }
    }
}
