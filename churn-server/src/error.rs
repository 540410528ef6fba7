//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use churn_core::{ErrorKind, ServiceError, ValidationReport};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// Failure from the prediction service
    Service(ServiceError),

    /// Body could not be parsed as the expected JSON
    MalformedBody(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Service(err) => match err.kind() {
                ErrorKind::CallerError => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::NotReady => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::InternalFault => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::MalformedBody(msg) => json!({
                "error": msg,
                "status": status.as_u16(),
                "kind": "validation",
                "violations": [{ "field": "body", "message": msg }],
            }),
            AppError::Service(ServiceError::Validation(report)) => {
                tracing::debug!("Rejected request: {}", report);
                json!({
                    "error": report.to_string(),
                    "status": status.as_u16(),
                    "kind": "validation",
                    "violations": report.violations,
                })
            }
            AppError::Service(ServiceError::ModelUnavailable) => json!({
                "error": "Model not loaded",
                "status": status.as_u16(),
                "kind": "model_unavailable",
            }),
            AppError::Service(err) => {
                tracing::error!("{} error: {}", err.tag(), err);
                json!({
                    "error": err.to_string(),
                    "status": status.as_u16(),
                    "kind": err.tag(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<ValidationReport> for AppError {
    fn from(report: ValidationReport) -> Self {
        AppError::Service(ServiceError::Validation(report))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}
