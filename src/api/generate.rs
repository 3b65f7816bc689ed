use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::GenerateRequest;
use crate::services::{GeneratedSprite, SpriteService};

/// Successful generation
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Always `true`
    pub success: bool,
    pub image: SpriteImage,
    /// Seconds spent on the whole request
    #[schema(example = 12.4)]
    pub generation_time: f64,
}

/// Encoded sprite
#[derive(Debug, Serialize, ToSchema)]
pub struct SpriteImage {
    /// Base64 PNG, RGBA
    pub base64: String,
    #[schema(example = 64)]
    pub width: u32,
    #[schema(example = 64)]
    pub height: u32,
    /// Always `rgba`
    #[schema(example = "rgba")]
    pub mode: String,
}

/// Error envelope shared by every failing request
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    #[schema(example = "No prompt provided")]
    pub error: String,
}

impl From<GeneratedSprite> for GenerateResponse {
    fn from(sprite: GeneratedSprite) -> Self {
        Self {
            success: true,
            image: SpriteImage {
                base64: sprite.base64,
                width: sprite.width,
                height: sprite.height,
                mode: "rgba".to_string(),
            },
            generation_time: sprite.generation_time,
        }
    }
}

/// Generate a pixel-art sprite
///
/// Sends the prompt to the selected cloud backend, then downscales and
/// palette-reduces the result into a sprite of the requested size.
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Sprite generated", body = GenerateResponse),
        (status = 400, description = "Invalid request (e.g. missing prompt)", body = ErrorResponse),
        (status = 401, description = "No API key for the selected provider", body = ErrorResponse),
        (status = 413, description = "Request body over the configured limit", body = ErrorResponse),
        (status = 500, description = "Backend or processing failure", body = ErrorResponse),
    ),
    tag = "Generation"
)]
pub async fn handle_generate(
    State(service): State<Arc<SpriteService>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(rejection_error)?;

    tracing::info!(
        provider = request.ai_provider.as_deref().unwrap_or("openai"),
        width = ?request.pixel_width,
        height = ?request.pixel_height,
        colors = ?request.colors,
        has_guide = request.init_image.is_some(),
        "Generation requested"
    );

    let sprite = tokio::task::spawn_blocking(move || service.generate(request))
        .await
        .map_err(|e| ApiError::Internal(format!("Generation task failed: {e}")))??;

    Ok(Json(sprite.into()))
}

fn rejection_error(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("Request too large: {}", rejection.body_text()))
    } else {
        ApiError::Validation(format!("Invalid request: {}", rejection.body_text()))
    }
}
