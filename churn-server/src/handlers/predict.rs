//! Prediction handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use churn_core::{
    BatchResult, InferenceError, PredictionResult, RawCustomerRecord, ServiceError, ServiceResult,
};
use serde::{Deserialize, Serialize};

use crate::{AppResult, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictionRequest {
    pub customers: Vec<RawCustomerRecord>,
}

/// Score one customer
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RawCustomerRecord>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Json(customer) = payload?;
    let service = state.service.clone();
    let result = run_blocking(move || service.predict(&customer)).await?;

    tracing::debug!(
        "Prediction: {} (p={:.4}, {})",
        result.churn_prediction,
        result.churn_probability,
        result.risk_level
    );

    Ok(Json(result))
}

/// Score 1..=100 customers in one classifier call
pub async fn predict_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchPredictionRequest>, JsonRejection>,
) -> AppResult<Json<BatchResult>> {
    let Json(request) = payload?;
    let service = state.service.clone();
    let result = run_blocking(move || service.predict_batch(&request.customers)).await?;

    tracing::info!(
        "Batch prediction: {} customers, {} high risk, {:.2}ms",
        result.total_customers,
        result.high_risk_count,
        result.processing_time_ms
    );

    Ok(Json(result))
}

/// Classifier work runs on the blocking pool, off the async workers
async fn run_blocking<T, F>(work: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        ServiceError::from(InferenceError::new(format!("Prediction task failed: {}", e)))
    })?
}
