//! Feature Vector - Model input built from a validated record
//!
//! The bundle's feature-name list is authoritative: values are always
//! selected in that order, never in request order.

use std::collections::HashMap;

use ndarray::Array2;
use serde::Serialize;

use super::layout::training_label;
use crate::error::ServiceError;
use crate::schema::CustomerRecord;

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Values ordered exactly like the bundle's feature-name list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// MAPPING
// ============================================================================

/// Translate a record's fields to training labels and order them by
/// `feature_names`.
///
/// Fails with `FeatureMismatch` listing every feature that has no value.
pub fn map_record<S: AsRef<str>>(
    record: &CustomerRecord,
    feature_names: &[S],
) -> Result<FeatureVector, ServiceError> {
    let by_label: HashMap<&str, f64> = record
        .fields()
        .into_iter()
        .map(|(field, value)| (training_label(field), value))
        .collect();

    let mut values = Vec::with_capacity(feature_names.len());
    let mut missing = Vec::new();

    for name in feature_names {
        match by_label.get(name.as_ref()) {
            Some(&v) => values.push(v),
            None => missing.push(name.as_ref().to_string()),
        }
    }

    if !missing.is_empty() {
        log::error!("Missing feature columns: {:?}", missing);
        return Err(ServiceError::FeatureMismatch { missing });
    }

    Ok(FeatureVector { values })
}

/// Stack vectors into a row-major `[rows, width]` matrix
pub fn feature_matrix(vectors: &[FeatureVector], width: usize) -> Array2<f64> {
    let mut matrix = Array2::<f64>::zeros((vectors.len(), width));
    for (mut row, vector) in matrix.rows_mut().into_iter().zip(vectors) {
        for (cell, value) in row.iter_mut().zip(vector.as_slice()) {
            *cell = *value;
        }
    }
    matrix
}

// ============================================================================
// TESTS
// ============================================================================
