use pixel_art::RawImage;
use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::ApiKey;

/// JSON body of `POST /generate`, as sent by the editor extension.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Text description of the sprite
    #[serde(default)]
    #[schema(example = "a knight with a sword")]
    pub prompt: Option<String>,

    /// Backend API key. Falls back to the server's configured key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// `openai` (default) or `stability`
    #[serde(default)]
    #[schema(example = "openai")]
    pub ai_provider: Option<String>,

    /// Base64 PNG (or data URL) used as structure guide
    #[serde(default)]
    pub init_image: Option<String>,

    /// How much the guide may change, 0.0 - 1.0
    #[serde(default)]
    pub strength: Option<f32>,

    #[serde(default, deserialize_with = "lenient_int")]
    #[schema(example = 64)]
    pub pixel_width: Option<i64>,

    #[serde(default, deserialize_with = "lenient_int")]
    #[schema(example = 64)]
    pub pixel_height: Option<i64>,

    /// Palette size, 0 disables quantization
    #[serde(default, deserialize_with = "lenient_int")]
    #[schema(example = 16)]
    pub colors: Option<i64>,
}

/// Integer fields arrive from editor scripts as `32`, `32.0` or `"32"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseInt {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accept integers, floats (truncated toward zero) and numeric strings.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LooseInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LooseInt::Int(v)) => Ok(Some(v)),
        Some(LooseInt::Float(v)) if v.is_finite() => Ok(Some(v.trunc() as i64)),
        Some(LooseInt::Float(v)) => Err(de::Error::custom(format!("invalid integer {v}"))),
        Some(LooseInt::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid integer '{text}'"))),
    }
}

/// Which generation backend serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Prompt only (OpenAI images API)
    TextToImage,
    /// Prompt plus a guide image whose structure is kept (Stability AI)
    StructureGuided,
}

impl ProviderKind {
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::TextToImage => "openai",
            ProviderKind::StructureGuided => "stability",
        }
    }

    /// Human-readable backend name used in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::TextToImage => "OpenAI",
            ProviderKind::StructureGuided => "Stability",
        }
    }

    /// Parse the optional `ai_provider` field. Absent or blank selects
    /// text-to-image.
    pub fn from_selector(selector: Option<&str>) -> Result<Self, UnknownProvider> {
        match selector.map(str::trim) {
            None | Some("") => Ok(ProviderKind::TextToImage),
            Some(name) => name.parse(),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown ai_provider '{}' (expected 'openai' or 'stability')",
            self.0
        )
    }
}

impl std::error::Error for UnknownProvider {}

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "dall-e-3" | "dalle" | "text-to-image" => Ok(ProviderKind::TextToImage),
            "stability" | "stability-structure" | "structure" | "structure-guided" => {
                Ok(ProviderKind::StructureGuided)
            }
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// A validated generation request with every default resolved.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub provider: ProviderKind,
    pub credentials: ApiKey,
    pub guide: Option<RawImage>,
    /// Already clamped into `[0, 1]`
    pub strength: Option<f32>,
    pub width: u32,
    pub height: u32,
    /// 0 disables quantization
    pub colors: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_aliases() {
        for name in ["openai", "OpenAI", "dall-e-3", "dalle", "text-to-image"] {
            assert_eq!(name.parse::<ProviderKind>(), Ok(ProviderKind::TextToImage));
        }
        for name in [
            "stability",
            "Stability",
            "stability-structure",
            "structure",
            "structure-guided",
        ] {
            assert_eq!(
                name.parse::<ProviderKind>(),
                Ok(ProviderKind::StructureGuided)
            );
        }
    }

    #[test]
    fn test_missing_selector_defaults_to_text_to_image() {
        assert_eq!(
            ProviderKind::from_selector(None),
            Ok(ProviderKind::TextToImage)
        );
        assert_eq!(
            ProviderKind::from_selector(Some("  ")),
            Ok(ProviderKind::TextToImage)
        );
    }

    #[test]
    fn test_unknown_provider() {
        let err = ProviderKind::from_selector(Some("midjourney")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown ai_provider 'midjourney' (expected 'openai' or 'stability')"
        );
    }

    #[test]
    fn test_request_fields_are_optional() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.prompt.is_none());
        assert!(request.pixel_width.is_none());

        let request: GenerateRequest = serde_json::from_str(
            r#"{"prompt":"cat","ai_provider":"stability","strength":0.35,"pixel_width":32,"colors":0}"#,
        )
        .unwrap();
        assert_eq!(request.prompt.as_deref(), Some("cat"));
        assert_eq!(request.strength, Some(0.35));
        assert_eq!(request.pixel_width, Some(32));
        assert_eq!(request.colors, Some(0));
    }

    #[test]
    fn test_integer_fields_accept_floats_and_strings() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{"pixel_width":32.0,"pixel_height":" 48 ","colors":7.9}"#,
        )
        .unwrap();
        assert_eq!(request.pixel_width, Some(32));
        assert_eq!(request.pixel_height, Some(48));
        assert_eq!(request.colors, Some(7));

        let request: GenerateRequest =
            serde_json::from_str(r#"{"pixel_width":null,"colors":-2.5}"#).unwrap();
        assert_eq!(request.pixel_width, None);
        assert_eq!(request.colors, Some(-2));
    }

    #[test]
    fn test_integer_fields_reject_non_numbers() {
        for body in [
            r#"{"pixel_width":"wide"}"#,
            r#"{"colors":"8.5"}"#,
            r#"{"pixel_height":true}"#,
        ] {
            assert!(
                serde_json::from_str::<GenerateRequest>(body).is_err(),
                "expected rejection for {body}"
            );
        }
    }
}
