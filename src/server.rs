//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::error::ApiError;
use crate::models::{AppConfig, GenerateRequest};
use crate::services::SpriteService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sprites: Arc<SpriteService>,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> AppState {
    let sprites = Arc::new(SpriteService::new(Arc::new(config)));
    AppState { sprites }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
/// Any origin may call the API. Bodies are capped at `max_body_bytes`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.sprites.config().max_body_bytes;
    Router::new()
        .route("/generate", post(handle_generate))
        .route("/health", get(handle_health))
        .route("/models", get(handle_models))
        .route("/loras", get(api::handle_loras))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<api::GenerateResponse>, ApiError> {
    api::handle_generate(State(state.sprites), payload).await
}

async fn handle_health(State(state): State<AppState>) -> Json<api::HealthResponse> {
    api::handle_health(State(state.sprites)).await
}

async fn handle_models(State(state): State<AppState>) -> Json<api::ModelsResponse> {
    api::handle_models(State(state.sprites)).await
}
