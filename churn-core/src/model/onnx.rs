//! ONNX Classifier - ONNX Runtime Integration
//!
//! Runs an exported classifier (e.g. LightGBM via onnxmltools) in-process.
//! Export with ZipMap disabled so that probabilities come back as a plain
//! `[N, 2]` float tensor next to the `[N]` int64 label tensor.

use std::path::Path;

use ndarray::{Array1, Array2, ArrayView2};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;

use super::classifier::Classifier;
use crate::error::InferenceError;

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    /// `Session::run` needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    proba_output: String,
    /// Second input dimension, when the graph fixes it
    n_features: Option<usize>,
}

impl OnnxClassifier {
    /// Load an exported model from disk
    pub fn from_file(model_path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError(format!("Model not found: {}", model_path.display())));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

        Self::from_session(session)
    }

    /// Load an exported model already read into memory
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| InferenceError(format!("Load from memory error: {}", e)))?;

        Self::from_session(session)
    }

    fn from_session(session: Session) -> Result<Self, InferenceError> {
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| InferenceError("No input defined".to_string()))?;

        // [N, features]; dynamic dims come back negative
        let n_features = session
            .inputs
            .first()
            .and_then(|input| input.input_type.tensor_shape())
            .and_then(|shape| shape.get(1).copied())
            .and_then(|dim| usize::try_from(dim).ok());

        let outputs: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        let label_output = outputs
            .iter()
            .find(|name| name.contains("label"))
            .or_else(|| outputs.first())
            .cloned()
            .ok_or_else(|| InferenceError("No output defined".to_string()))?;

        let proba_output = outputs
            .iter()
            .find(|name| name.contains("prob"))
            .or_else(|| outputs.iter().find(|name| **name != label_output))
            .cloned()
            .ok_or_else(|| InferenceError("No probability output defined".to_string()))?;

        log::info!(
            "ONNX model loaded: input={} (width {:?}), label={}, probabilities={}",
            input_name,
            n_features,
            label_output,
            proba_output
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            label_output,
            proba_output,
            n_features,
        })
    }

    /// Single session run producing both outputs
    fn run(&self, features: ArrayView2<'_, f64>) -> Result<(Array1<i64>, Array2<f64>), InferenceError> {
        let (rows, cols) = features.dim();

        // Runtime expects float32, row-major
        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_tensor = Tensor::from_array((vec![rows as i64, cols as i64], data))
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let label_value = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| InferenceError(format!("No output '{}'", self.label_output)))?;
        let (_, label_data) = label_value
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError(format!("Label extract error: {}", e)))?;
        let labels = Array1::from_vec(label_data.to_vec());

        let proba_value = outputs
            .get(self.proba_output.as_str())
            .ok_or_else(|| InferenceError(format!("No output '{}'", self.proba_output)))?;
        let (_, proba_data) = proba_value.try_extract_tensor::<f32>().map_err(|e| {
            InferenceError(format!(
                "Probability extract error (export with zipmap disabled): {}",
                e
            ))
        })?;

        if rows == 0 || proba_data.len() % rows != 0 {
            return Err(InferenceError(format!(
                "Probability output has {} values for {} rows",
                proba_data.len(),
                rows
            )));
        }
        let classes = proba_data.len() / rows;
        let probabilities = Array2::from_shape_vec(
            (rows, classes),
            proba_data.iter().map(|&p| p as f64).collect(),
        )
        .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        Ok((labels, probabilities))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<i64>, InferenceError> {
        self.run(features).map(|(labels, _)| labels)
    }

    fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, InferenceError> {
        self.run(features).map(|(_, probabilities)| probabilities)
    }

    fn predict_with_proba(
        &self,
        features: ArrayView2<'_, f64>,
    ) -> Result<(Array1<i64>, Array2<f64>), InferenceError> {
        self.run(features)
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundleError;
    use crate::model::{infer, ArtifactBundle, ModelMetadata};
    use crate::test_support::{fixture_bundle, fixture_feature_names, fixture_metadata};
    use ndarray::Array2;

    const FIXTURE_MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/onnx/churn_model.onnx");

    fn fixture_classifier() -> OnnxClassifier {
        OnnxClassifier::from_file(Path::new(FIXTURE_MODEL)).unwrap()
    }

    /// Rows spread over the ranges the validator accepts
    fn sample_matrix(rows: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, 13), |(r, c)| match c {
            1 => (r % 2) as f64,
            11 => (15 + r % 50) as f64,
            8 => (1 + r % 5) as f64,
            9 | 10 => (1 + r % 2) as f64,
            _ => ((r * 37 + c * 11) % 60) as f64,
        })
    }

    #[test]
    fn test_missing_model_file() {
        let result = OnnxClassifier::from_file(Path::new("/nonexistent/churn_model.onnx"));
        match result {
            Err(InferenceError(msg)) => assert!(msg.starts_with("Model not found")),
            Ok(_) => panic!("Expected error for missing model"),
        }
    }

    #[test]
    fn test_reads_graph_metadata() {
        let model = fixture_classifier();
        assert_eq!(model.input_name, "float_input");
        assert_eq!(model.label_output, "label");
        assert_eq!(model.proba_output, "probabilities");
        assert_eq!(model.n_features(), Some(13));
        assert_eq!(model.backend(), "onnx");
    }

    #[test]
    fn test_from_bytes() {
        let bytes = std::fs::read(FIXTURE_MODEL).unwrap();
        let model = OnnxClassifier::from_bytes(&bytes).unwrap();
        assert_eq!(model.n_features(), Some(13));
    }

    #[test]
    fn test_infer_single_and_full_batch() {
        let bundle = ArtifactBundle::new(
            Box::new(fixture_classifier()),
            fixture_feature_names(),
            fixture_metadata(),
        )
        .unwrap();

        for rows in [1, 100] {
            let x = sample_matrix(rows);
            let scores = infer(&bundle, x.view()).unwrap();

            assert_eq!(scores.len(), rows);
            for score in &scores {
                assert!(score.label <= 1);
                assert!((0.0..=1.0).contains(&score.churn_probability));
            }
        }
    }

    #[test]
    fn test_probabilities_match_logistic_fixture() {
        let onnx = fixture_classifier();
        let reference = fixture_bundle();
        let x = sample_matrix(100);

        let (labels, proba) = onnx.predict_with_proba(x.view()).unwrap();
        let (ref_labels, ref_proba) = reference.classifier().predict_with_proba(x.view()).unwrap();

        assert_eq!(proba.dim(), (100, 2));
        for r in 0..100 {
            assert!((proba[[r, 1]] - ref_proba[[r, 1]]).abs() < 1e-4);
            assert!((proba[[r, 0]] + proba[[r, 1]] - 1.0).abs() < 1e-5);
            // Labels may only differ when p sits on the threshold in f32
            if (ref_proba[[r, 1]] - 0.5).abs() > 1e-4 {
                assert_eq!(labels[r], ref_labels[r]);
            }
        }
    }

    #[test]
    fn test_bundle_rejects_width_mismatch() {
        let names: Vec<String> = fixture_feature_names().into_iter().take(12).collect();
        let metadata = ModelMetadata {
            feature_count: 12,
            ..fixture_metadata()
        };

        match ArtifactBundle::new(Box::new(fixture_classifier()), names, metadata) {
            Err(err) => assert_eq!(
                err,
                BundleError::ClassifierWidth {
                    expected: 13,
                    actual: 12
                }
            ),
            Ok(_) => panic!("Expected width mismatch"),
        }
    }
}
