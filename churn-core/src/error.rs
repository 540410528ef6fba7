//! Error Types - Tagged failure kinds for the serving pipeline
//!
//! Every failure resolves to one of three stable categories so that callers
//! can tell a bad request from a service that is not ready yet or a fault
//! on our side.

use serde::Serialize;
use thiserror::Error;

use crate::schema::ValidationReport;

pub type ServiceResult<T> = Result<T, ServiceError>;

// ============================================================================
// ERROR KIND
// ============================================================================

/// Coarse category of a [`ServiceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-range input; fix the request, do not retry
    CallerError,
    /// Model bundle not published yet; retry later
    NotReady,
    /// Configuration or classifier fault
    InternalFault,
}

// ============================================================================
// SERVICE ERROR
// ============================================================================

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(ValidationReport),

    #[error("feature mismatch: no value for {}", .missing.join(", "))]
    FeatureMismatch { missing: Vec<String> },

    #[error("model not loaded")]
    ModelUnavailable,

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::CallerError,
            ServiceError::ModelUnavailable => ErrorKind::NotReady,
            ServiceError::FeatureMismatch { .. } | ServiceError::Inference(_) => {
                ErrorKind::InternalFault
            }
        }
    }

    /// Stable machine-readable tag
    pub fn tag(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::FeatureMismatch { .. } => "feature_mismatch",
            ServiceError::ModelUnavailable => "model_unavailable",
            ServiceError::Inference(_) => "inference",
        }
    }
}

impl From<ValidationReport> for ServiceError {
    fn from(report: ValidationReport) -> Self {
        ServiceError::Validation(report)
    }
}

// ============================================================================
// INFERENCE ERROR
// ============================================================================

/// Failure inside the classifier call, carrying the underlying cause
#[derive(Debug, Clone, Error)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);

impl InferenceError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

// ============================================================================
// BUNDLE ERROR
// ============================================================================

/// Artifacts that cannot form a consistent bundle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    #[error("feature name list is empty")]
    EmptyFeatureList,

    #[error("duplicate feature name '{0}'")]
    DuplicateFeature(String),

    #[error("metadata declares {declared} features but the feature list has {actual}")]
    FeatureCountMismatch { declared: usize, actual: usize },

    #[error("classifier expects {expected} inputs but the feature list has {actual}")]
    ClassifierWidth { expected: usize, actual: usize },
}
