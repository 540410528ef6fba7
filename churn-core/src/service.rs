//! Churn Service - The four logical operations
//!
//! `health`, `predict`, `predict_batch` and `model_info` over an injected
//! model registry. Every operation answers `ModelUnavailable` until a
//! bundle has been published.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ServiceResult;
use crate::features::TRANSLATION_VERSION;
use crate::latency::{LatencyMonitor, LatencyStats};
use crate::model::{ModelRegistry, PredictionResult};
use crate::pipeline::{self, BatchResult};
use crate::schema::RawCustomerRecord;

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub loaded: bool,
    pub accuracy: f64,
    pub feature_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub cv_accuracy: f64,
    pub cv_std: f64,
    pub test_accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub dataset: Option<String>,
    pub paper_reference: Option<String>,
    pub backend: &'static str,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub layout_hash: String,
    pub translation_version: u8,
    pub loaded_at: DateTime<Utc>,
    pub metrics: ModelMetrics,
}

// ============================================================================
// SERVICE
// ============================================================================

/// Cheap to clone; clones share the registry and latency counters
#[derive(Clone, Default)]
pub struct ChurnService {
    registry: ModelRegistry,
    latency: Arc<LatencyMonitor>,
}

impl ChurnService {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            latency: Arc::new(LatencyMonitor::default()),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn latency(&self) -> &LatencyMonitor {
        &self.latency
    }

    pub fn latency_stats(&self) -> LatencyStats {
        self.latency.stats()
    }

    pub fn health(&self) -> ServiceResult<HealthReport> {
        let bundle = self.registry.current()?;
        Ok(HealthReport {
            loaded: true,
            accuracy: bundle.metadata().cv_accuracy,
            feature_count: bundle.feature_count(),
        })
    }

    pub fn predict(&self, raw: &RawCustomerRecord) -> ServiceResult<PredictionResult> {
        let bundle = self.registry.current()?;
        pipeline::predict_one(&bundle, raw)
    }

    pub fn predict_batch(&self, raws: &[RawCustomerRecord]) -> ServiceResult<BatchResult> {
        let bundle = self.registry.current()?;
        pipeline::predict_batch(&bundle, raws)
    }

    pub fn model_info(&self) -> ServiceResult<ModelInfo> {
        let bundle = self.registry.current()?;
        let metadata = bundle.metadata();

        Ok(ModelInfo {
            model_type: metadata.model_type.clone(),
            dataset: metadata.dataset.clone(),
            paper_reference: metadata.paper_reference.clone(),
            backend: bundle.classifier().backend(),
            feature_count: bundle.feature_count(),
            feature_names: bundle.feature_names().to_vec(),
            layout_hash: format!("{:08x}", bundle.layout_hash()),
            translation_version: TRANSLATION_VERSION,
            loaded_at: bundle.loaded_at(),
            metrics: ModelMetrics {
                cv_accuracy: metadata.cv_accuracy,
                cv_std: metadata.cv_std,
                test_accuracy: metadata.test_accuracy,
            },
        })
    }
}
