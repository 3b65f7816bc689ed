use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::services::SpriteService;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    /// Always `cloud`: images come from remote backends
    #[schema(example = "cloud")]
    pub mode: String,
    /// Backends with a server-side API key, comma separated
    #[schema(example = "openai,stability")]
    pub service: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LorasResponse {
    pub loras: Vec<String>,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is running", body = HealthResponse)),
    tag = "Status"
)]
pub async fn handle_health(State(service): State<Arc<SpriteService>>) -> Json<HealthResponse> {
    let config = service.config();
    let configured: Vec<&str> = [
        ("openai", config.openai.api_key.is_some()),
        ("stability", config.stability.api_key.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, has_key)| has_key.then_some(name))
    .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        mode: "cloud".to_string(),
        service: if configured.is_empty() {
            "none".to_string()
        } else {
            configured.join(",")
        },
    })
}

/// Backend models
///
/// Kept for clients that expect a local model server.
#[utoipa::path(
    get,
    path = "/models",
    responses((status = 200, description = "Model names", body = ModelsResponse)),
    tag = "Status"
)]
pub async fn handle_models(State(service): State<Arc<SpriteService>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: service
            .providers()
            .iter()
            .map(|p| p.model().to_string())
            .collect(),
    })
}

/// LoRA list stub
#[utoipa::path(
    get,
    path = "/loras",
    responses((status = 200, description = "Always `[\"None\"]`", body = LorasResponse)),
    tag = "Status"
)]
pub async fn handle_loras() -> Json<LorasResponse> {
    Json(LorasResponse {
        loras: vec!["None".to_string()],
    })
}
