//! Pipeline - Single and batch prediction
//!
//! Validator → Mapper → Inference Engine → Risk tiers. Validation of every
//! record happens before any inference work; any failure aborts the whole
//! request, so a batch either answers for every record or for none.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, ServiceError, ServiceResult};
use crate::features::{feature_matrix, map_record, FeatureVector};
use crate::model::{infer, ArtifactBundle, PredictionResult, RiskLevel};
use crate::schema::{CustomerRecord, RawCustomerRecord, ValidationReport};

/// Smallest accepted batch
pub const MIN_BATCH_SIZE: usize = 1;

/// Largest accepted batch
pub const MAX_BATCH_SIZE: usize = 100;

/// Aggregated answer for a batch, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub predictions: Vec<PredictionResult>,
    pub total_customers: usize,
    pub high_risk_count: usize,
    pub processing_time_ms: f64,
}

// ============================================================================
// SINGLE RECORD
// ============================================================================

/// Predict for one raw record
pub fn predict_one(
    bundle: &ArtifactBundle,
    raw: &RawCustomerRecord,
) -> ServiceResult<PredictionResult> {
    let record = raw.validate()?;
    let vector = map_record(&record, bundle.feature_names())?;

    let matrix = feature_matrix(std::slice::from_ref(&vector), bundle.feature_count());
    let score = infer(bundle, matrix.view())?
        .into_iter()
        .next()
        .ok_or_else(|| InferenceError::new("Classifier returned no rows"))?;

    Ok(PredictionResult::from(score))
}

// ============================================================================
// BATCH
// ============================================================================

/// Predict for 1..=100 raw records with a single classifier call
pub fn predict_batch(
    bundle: &ArtifactBundle,
    raws: &[RawCustomerRecord],
) -> ServiceResult<BatchResult> {
    let start_time = Instant::now();

    check_batch_size(raws.len())?;
    let records = validate_batch(raws)?;

    let vectors = records
        .iter()
        .map(|record| map_record(record, bundle.feature_names()))
        .collect::<Result<Vec<FeatureVector>, ServiceError>>()?;

    let matrix = feature_matrix(&vectors, bundle.feature_count());
    let scores = infer(bundle, matrix.view())?;

    if scores.len() != raws.len() {
        return Err(InferenceError(format!(
            "Classifier returned {} rows for {} records",
            scores.len(),
            raws.len()
        ))
        .into());
    }

    let predictions: Vec<PredictionResult> =
        scores.into_iter().map(PredictionResult::from).collect();
    let high_risk_count = predictions
        .iter()
        .filter(|p| p.risk_level == RiskLevel::High)
        .count();

    let processing_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    log::debug!(
        "Batch of {} scored in {:.3}ms ({} high risk)",
        raws.len(),
        processing_time_ms,
        high_risk_count
    );

    Ok(BatchResult {
        predictions,
        total_customers: raws.len(),
        high_risk_count,
        processing_time_ms,
    })
}

/// Reject empty and oversized batches before touching any record
pub fn check_batch_size(len: usize) -> Result<(), ValidationReport> {
    if (MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&len) {
        return Ok(());
    }
    Err(ValidationReport::single(
        "customers",
        format!(
            "must contain between {} and {} records (got {})",
            MIN_BATCH_SIZE, MAX_BATCH_SIZE, len
        ),
    ))
}

/// Validate every record, collecting all violations with indexed paths
fn validate_batch(raws: &[RawCustomerRecord]) -> Result<Vec<CustomerRecord>, ValidationReport> {
    let mut report = ValidationReport::default();
    let mut records = Vec::with_capacity(raws.len());

    for (i, raw) in raws.iter().enumerate() {
        let prefix = format!("customers[{}].", i);
        if let Some(record) = raw.validate_into(&prefix, &mut report) {
            records.push(record);
        }
    }

    if report.is_empty() {
        Ok(records)
    } else {
        Err(report)
    }
}

// ============================================================================
// TESTS
// ============================================================================
