//! Model metadata handler

use axum::{extract::State, Json};
use churn_core::ModelInfo;

use crate::{AppResult, AppState};

pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    Ok(Json(state.service.model_info()?))
}
