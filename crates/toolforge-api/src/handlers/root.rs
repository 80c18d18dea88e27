//! Service info and health endpoints

use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use toolforge_core::constants::WELCOME_MESSAGE;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub message: String,
    pub docs: String,
    pub health: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub temp_dir: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses((status = 200, description = "Service banner", body = InfoResponse))
)]
pub async fn root() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: WELCOME_MESSAGE.to_string(),
        docs: "/docs".to_string(),
        health: "/health".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        temp_dir: state.workspaces.root().display().to_string(),
    })
}
