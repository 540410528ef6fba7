//! Churn Prediction Core - Inference pipeline
//!
//! Validates raw telecom customer records, maps them into the exact feature
//! order the classifier was trained on, and turns classifier output into
//! churn predictions with risk tiers.
//!
//! ## Layout
//! - `schema` - Customer record shape and field constraints
//! - `features/` - Field translation and ordered feature vectors
//! - `model/` - Artifact bundle, classifier runtimes, inference, risk tiers
//! - `pipeline` - Single and batch prediction
//! - `service` - The four logical operations over a model registry
//! - `latency` - Request timing

pub mod error;
pub mod features;
pub mod latency;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod service;

#[cfg(test)]
mod test_support;

// Re-export common types
pub use error::{BundleError, ErrorKind, InferenceError, ServiceError, ServiceResult};
pub use latency::{LatencyMonitor, LatencyStats};
pub use model::{
    ArtifactBundle, Classifier, LogisticClassifier, ModelMetadata, ModelRegistry,
    PredictionResult, RiskLevel,
};
#[cfg(feature = "onnx")]
pub use model::OnnxClassifier;
pub use pipeline::{BatchResult, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
pub use schema::{CustomerRecord, RawCustomerRecord, ValidationReport};
pub use service::{ChurnService, HealthReport, ModelInfo, ModelMetrics};
