//! Application setup and initialization
//!
//! Everything main.rs needs to go from a `Config` to a running router, kept
//! here so integration tests can build the same application.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use toolforge_core::constants::SERVICE_NAME;
use toolforge_core::Config;
use toolforge_storage::{LocalWorkspaceProvider, WorkspaceProvider};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    toolforge_infra::init_telemetry(
        config.log_format(),
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        config.environment(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");
    crate::error::configure_error_details(&config);

    let state = build_state(config).await?;
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Create the workspace provider, sweep leftovers from earlier runs and build the state.
pub async fn build_state(config: Config) -> Result<Arc<AppState>> {
    let provider = LocalWorkspaceProvider::new(config.temp_dir())
        .await
        .with_context(|| format!("Failed to prepare temp dir {}", config.temp_dir().display()))?;

    match provider.sweep_stale(config.workspace_stale_after()).await {
        Ok(0) => {}
        Ok(removed) => tracing::info!(removed, "Removed stale workspaces"),
        Err(e) => tracing::warn!(error = %e, "Stale workspace sweep failed"),
    }

    tracing::info!(
        temp_dir = %config.temp_dir().display(),
        max_concurrent_conversions = config.max_concurrent_conversions(),
        conversion_timeout_secs = config.conversion_timeout().as_secs(),
        "Workspace provider ready"
    );

    let workspaces: Arc<dyn WorkspaceProvider> = Arc::new(provider);
    Ok(Arc::new(AppState::new(config, workspaces)))
}
