//! Classifier - Fitted model seam
//!
//! The pipeline only needs predict / predict_proba over a feature matrix.
//! Any fitted model that can answer those two questions plugs in here.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Fitted binary classifier
///
/// Rows of `features` are records, columns follow the bundle's feature list.
pub trait Classifier: Send + Sync {
    /// Predicted class label per row
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<i64>, InferenceError>;

    /// Class probabilities per row, `[rows, classes]`
    fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, InferenceError>;

    /// Labels and probabilities together. Runtimes that produce both from a
    /// single run override this.
    fn predict_with_proba(
        &self,
        features: ArrayView2<'_, f64>,
    ) -> Result<(Array1<i64>, Array2<f64>), InferenceError> {
        Ok((self.predict(features)?, self.predict_proba(features)?))
    }

    /// Input width, when the model declares one
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Short human-readable name of the runtime
    fn backend(&self) -> &'static str;
}

// ============================================================================
// LOGISTIC CLASSIFIER
// ============================================================================

fn default_decision_threshold() -> f64 {
    0.5
}

/// Fitted logistic regression, serialized as JSON
///
/// ```json
/// { "intercept": -1.2, "coefficients": [0.3, ...], "decision_threshold": 0.5 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default = "default_decision_threshold")]
    pub decision_threshold: f64,
}

impl LogisticClassifier {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
            decision_threshold: default_decision_threshold(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        serde_json::from_str(json)
            .map_err(|e| InferenceError(format!("Invalid logistic model: {}", e)))
    }

    /// Positive-class probability per row
    fn churn_probability(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>, InferenceError> {
        if features.ncols() != self.coefficients.len() {
            return Err(InferenceError(format!(
                "Expected {} features, got {}",
                self.coefficients.len(),
                features.ncols()
            )));
        }

        let weights = Array1::from_vec(self.coefficients.clone());
        let logits = features.dot(&weights) + self.intercept;
        Ok(logits.mapv(sigmoid))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticClassifier {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<i64>, InferenceError> {
        let threshold = self.decision_threshold;
        Ok(self
            .churn_probability(features)?
            .mapv(|p| i64::from(p >= threshold)))
    }

    fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, InferenceError> {
        let p = self.churn_probability(features)?.insert_axis(Axis(1));
        let q = p.mapv(|v| 1.0 - v);
        ndarray::concatenate(Axis(1), &[q.view(), p.view()])
            .map_err(|e| InferenceError(format!("Array error: {}", e)))
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn backend(&self) -> &'static str {
        "logistic"
    }
}

// ============================================================================
// TESTS
// ============================================================================
