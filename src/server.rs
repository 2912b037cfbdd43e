//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, Method},
    response::{Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::api::{self, DesignSummary};
use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::ContentPipeline;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<ContentPipeline>,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    create_app_state_with_config(asset_loader, config)
}

/// Create application state around an already loaded config.
pub fn create_app_state_with_config(
    asset_loader: Arc<AssetLoader>,
    config: Arc<AppConfig>,
) -> anyhow::Result<AppState> {
    let pipeline = ContentPipeline::from_config(config.clone(), asset_loader)
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

    Ok(AppState {
        config,
        pipeline: Arc::new(pipeline),
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. Images are
/// meant to be embedded cross-origin, so CORS allows any origin.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/designs", get(handle_list_designs))
        .route("/api/designs/:design", get(handle_design_image_query))
        .route("/api/designs/:design/:fid", get(handle_design_image))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_list_designs(State(state): State<AppState>) -> Json<Vec<DesignSummary>> {
    api::handle_list_designs(State(state.config)).await
}

async fn handle_design_image(
    State(state): State<AppState>,
    path: Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    api::handle_design_image(State(state.pipeline), path, headers).await
}

async fn handle_design_image_query(
    State(state): State<AppState>,
    path: Path<String>,
    query: Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    api::handle_design_image_query(State(state.pipeline), path, query, headers).await
}
