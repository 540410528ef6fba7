//! Model Module - Artifact bundle and inference
//!
//! Classifier runtimes sit behind the `Classifier` trait so the pipeline
//! does not care whether the fitted model is ONNX or a plain linear model.

pub mod bundle;
pub mod classifier;
pub mod inference;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod registry;
pub mod risk;

// Re-export common types
pub use bundle::{ArtifactBundle, ModelMetadata};
pub use classifier::{Classifier, LogisticClassifier};
pub use inference::{infer, ClassScore, PredictionResult};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use registry::ModelRegistry;
pub use risk::{risk_level, RiskLevel, RISK_TIERS};
