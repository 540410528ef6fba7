//! Inference Engine - Classifier invocation
//!
//! Pure delegation to the bundle's classifier plus output sanity checks.
//! One call covers the whole matrix, whether it holds one row or a batch.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use super::bundle::ArtifactBundle;
use super::risk::{risk_level, RiskLevel};
use crate::error::InferenceError;

/// Index of the churn class in `predict_proba` output
pub const CHURN_CLASS: usize = 1;

/// Probabilities this far outside [0, 1] are float noise and get clamped
const PROBABILITY_TOLERANCE: f64 = 1e-6;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Raw classifier output for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScore {
    pub label: u8,
    pub churn_probability: f64,
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub churn_prediction: u8,        // 0: stays, 1: churns
    pub churn_probability: f64,      // 0.0 - 1.0
    pub risk_level: RiskLevel,
    pub confidence: f64,             // probability of the predicted class
}

impl From<ClassScore> for PredictionResult {
    fn from(score: ClassScore) -> Self {
        let p = score.churn_probability;
        Self {
            churn_prediction: score.label,
            churn_probability: p,
            risk_level: risk_level(p),
            confidence: if score.label == 1 { p } else { 1.0 - p },
        }
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Run the classifier over `features` (`[rows, feature_count]`)
pub fn infer(
    bundle: &ArtifactBundle,
    features: ArrayView2<'_, f64>,
) -> Result<Vec<ClassScore>, InferenceError> {
    let rows = features.nrows();

    if features.ncols() != bundle.feature_count() {
        return Err(InferenceError(format!(
            "Matrix has {} columns, bundle expects {}",
            features.ncols(),
            bundle.feature_count()
        )));
    }

    let (labels, probabilities) = bundle.classifier().predict_with_proba(features)?;

    if labels.len() != rows {
        return Err(InferenceError(format!(
            "Classifier returned {} labels for {} rows",
            labels.len(),
            rows
        )));
    }
    if probabilities.nrows() != rows || probabilities.ncols() <= CHURN_CLASS {
        return Err(InferenceError(format!(
            "Classifier returned probabilities of shape {:?} for {} rows",
            probabilities.dim(),
            rows
        )));
    }

    labels
        .iter()
        .zip(probabilities.column(CHURN_CLASS))
        .map(|(&label, &p)| {
            let label = match label {
                0 => 0,
                1 => 1,
                other => return Err(InferenceError(format!("Unexpected class label {}", other))),
            };
            if !p.is_finite()
                || p < -PROBABILITY_TOLERANCE
                || p > 1.0 + PROBABILITY_TOLERANCE
            {
                return Err(InferenceError(format!("Probability out of range: {}", p)));
            }
            Ok(ClassScore {
                label,
                churn_probability: p.clamp(0.0, 1.0),
            })
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, ModelMetadata};
    use crate::test_support::{fixture_bundle, fixture_metadata};
    use ndarray::{array, Array1, Array2};

    /// Classifier returning canned outputs
    struct Canned {
        labels: Vec<i64>,
        proba: Vec<[f64; 2]>,
    }

    impl Classifier for Canned {
        fn predict(&self, _: ArrayView2<'_, f64>) -> Result<Array1<i64>, InferenceError> {
            Ok(Array1::from_vec(self.labels.clone()))
        }

        fn predict_proba(&self, _: ArrayView2<'_, f64>) -> Result<Array2<f64>, InferenceError> {
            let flat: Vec<f64> = self.proba.iter().flatten().copied().collect();
            Array2::from_shape_vec((self.proba.len(), 2), flat)
                .map_err(|e| InferenceError(e.to_string()))
        }

        fn backend(&self) -> &'static str {
            "canned"
        }
    }

    fn canned_bundle(labels: Vec<i64>, proba: Vec<[f64; 2]>) -> ArtifactBundle {
        let metadata = ModelMetadata { feature_count: 1, ..fixture_metadata() };
        ArtifactBundle::new(Box::new(Canned { labels, proba }), vec!["Age".into()], metadata)
            .unwrap()
    }

    #[test]
    fn test_confidence_follows_prediction() {
        let churn = PredictionResult::from(ClassScore { label: 1, churn_probability: 0.8 });
        assert_eq!(churn.confidence, 0.8);
        assert_eq!(churn.risk_level, RiskLevel::High);

        let stay = PredictionResult::from(ClassScore { label: 0, churn_probability: 0.3 });
        assert!((stay.confidence - 0.7).abs() < 1e-12);
        assert_eq!(stay.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_infer_fixture_rows() {
        let bundle = fixture_bundle();
        let x = Array2::<f64>::zeros((3, bundle.feature_count()));

        let scores = infer(&bundle, x.view()).unwrap();
        assert_eq!(scores.len(), 3);
        for score in scores {
            assert!((0.0..=1.0).contains(&score.churn_probability));
        }
    }

    #[test]
    fn test_wrong_width_rejected() {
        let bundle = fixture_bundle();
        let x = Array2::<f64>::zeros((1, 4));
        assert!(infer(&bundle, x.view()).is_err());
    }

    #[test]
    fn test_label_count_mismatch() {
        let bundle = canned_bundle(vec![0], vec![[0.9, 0.1], [0.8, 0.2]]);
        let x = array![[1.0], [2.0]];
        let err = infer(&bundle, x.view()).unwrap_err();
        assert!(err.0.contains("labels"));
    }

    #[test]
    fn test_unexpected_label() {
        let bundle = canned_bundle(vec![2], vec![[0.5, 0.5]]);
        let x = array![[1.0]];
        assert!(infer(&bundle, x.view()).is_err());
    }

    #[test]
    fn test_probability_out_of_range() {
        let bundle = canned_bundle(vec![1], vec![[-0.5, 1.5]]);
        let x = array![[1.0]];
        assert!(infer(&bundle, x.view()).is_err());

        let bundle = canned_bundle(vec![0], vec![[0.0, f64::NAN]]);
        assert!(infer(&bundle, x.view()).is_err());
    }

    #[test]
    fn test_float_noise_clamped() {
        let bundle = canned_bundle(vec![1], vec![[0.0, 1.0 + 1e-9]]);
        let x = array![[1.0]];
        let scores = infer(&bundle, x.view()).unwrap();
        assert_eq!(scores[0].churn_probability, 1.0);
    }
}
