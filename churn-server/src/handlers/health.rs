//! Liveness and health check handlers

use axum::{extract::State, Json};
use churn_core::LatencyStats;
use serde::Serialize;

use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct LiveResponse {
    status: &'static str,
}

/// Process is up; does not need a model
pub async fn live() -> Json<LiveResponse> {
    Json(LiveResponse { status: "alive" })
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    model_accuracy: f64,
    features: usize,
    version: &'static str,
    latency: LatencyStats,
}

pub async fn check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let report = state.service.health()?;

    Ok(Json(HealthResponse {
        status: "healthy",
        model_loaded: report.loaded,
        model_accuracy: report.accuracy,
        features: report.feature_count,
        version: env!("CARGO_PKG_VERSION"),
        latency: state.service.latency_stats(),
    }))
}
