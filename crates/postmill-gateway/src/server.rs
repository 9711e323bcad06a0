// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use postmill_config::model::GatewayConfig;
use postmill_core::PostmillError;
use postmill_cron::Scheduler;
use postmill_pipeline::PipelineWorkers;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, api_key_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub workers: PipelineWorkers,
    pub scheduler: Arc<Scheduler>,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

/// All routes with auth applied to the mutating ones.
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let trigger_routes = Router::new()
        .route("/pipeline", post(handlers::post_pipeline))
        .route("/replenish", post(handlers::post_replenish))
        .route("/reload-schedule", post(handlers::post_reload_schedule))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            api_key_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(trigger_routes)
        .layer(TraceLayer::new_for_http())
}

/// Serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), PostmillError> {
    if state.auth.is_open() {
        tracing::warn!("no gateway API key configured, trigger routes are open");
    }
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PostmillError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| PostmillError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
