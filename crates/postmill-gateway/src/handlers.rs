// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use postmill_cron::JobInfo;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::server::GatewayState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub scheduled_jobs: Vec<JobInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub message: String,
    pub jobs: Vec<JobInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn internal_error(route: &str, message: String) -> Response {
    error!(route, error = %message, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        scheduled_jobs: state.scheduler.jobs().await,
    })
}

/// POST /pipeline
///
/// Pipeline failures are reported in the body with status 200; 500 means
/// the run could not be dispatched at all.
pub async fn post_pipeline(State(state): State<GatewayState>) -> Response {
    match state.workers.run_pipeline().await {
        Ok(result) => Json(result).into_response(),
        Err(err) => internal_error("/pipeline", err.to_string()),
    }
}

/// POST /replenish
pub async fn post_replenish(State(state): State<GatewayState>) -> Response {
    match state.workers.run_replenish().await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => internal_error("/replenish", err.to_string()),
    }
}

/// POST /reload-schedule
pub async fn post_reload_schedule(State(state): State<GatewayState>) -> Json<ReloadResponse> {
    Json(ReloadResponse {
        message: "Schedule reloaded".into(),
        jobs: state.scheduler.reload().await,
    })
}
