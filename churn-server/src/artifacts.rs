//! Artifact loading
//!
//! Reads the artifact directory produced by training and builds a validated
//! bundle. Layout:
//!
//! ```text
//! artifacts/
//! ├── feature_names.json    ordered training feature names
//! ├── model_metadata.json   cv/test accuracy, model type, feature count
//! ├── churn_model.onnx      classifier (preferred, `onnx` feature)
//! └── churn_model.json      classifier (logistic coefficients)
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use churn_core::features::TRANSLATION_VERSION;
use churn_core::{ArtifactBundle, Classifier, LogisticClassifier, ModelMetadata};
use sha2::{Digest, Sha256};

pub const FEATURE_NAMES_FILE: &str = "feature_names.json";
pub const METADATA_FILE: &str = "model_metadata.json";
pub const ONNX_MODEL_FILE: &str = "churn_model.onnx";
pub const LOGISTIC_MODEL_FILE: &str = "churn_model.json";

#[cfg(test)]
pub(crate) const FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/artifacts");

#[cfg(all(test, feature = "onnx"))]
pub(crate) const ONNX_FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/onnx");

/// Load and validate the bundle stored in `dir`
pub fn load_bundle(dir: &Path) -> Result<ArtifactBundle> {
    tracing::info!("Loading model artifacts from {}", dir.display());

    let feature_names: Vec<String> = read_json(&dir.join(FEATURE_NAMES_FILE))?;
    let metadata: ModelMetadata = read_json(&dir.join(METADATA_FILE))?;
    let classifier = load_classifier(dir)?;

    let bundle = ArtifactBundle::new(classifier, feature_names, metadata)
        .context("Artifacts do not form a consistent bundle")?;

    tracing::info!(
        "Model loaded: {} ({} features, layout {:08x}, translation v{}, cv_accuracy {:.4})",
        bundle.metadata().model_type,
        bundle.feature_count(),
        bundle.layout_hash(),
        TRANSLATION_VERSION,
        bundle.metadata().cv_accuracy
    );

    Ok(bundle)
}

fn load_classifier(dir: &Path) -> Result<Box<dyn Classifier>> {
    #[cfg(feature = "onnx")]
    {
        let path = dir.join(ONNX_MODEL_FILE);
        if path.exists() {
            log_checksum(&path)?;
            let classifier = churn_core::OnnxClassifier::from_file(&path)
                .with_context(|| format!("Failed to load ONNX model {}", path.display()))?;
            return Ok(Box::new(classifier));
        }
    }

    let path = dir.join(LOGISTIC_MODEL_FILE);
    if path.exists() {
        log_checksum(&path)?;
        let json = read_to_string(&path)?;
        let classifier = LogisticClassifier::from_json(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        return Ok(Box::new(classifier));
    }

    bail!("No classifier found in {}", dir.display())
}

/// SHA-256 of a file, hex encoded
pub fn file_checksum(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

fn log_checksum(path: &Path) -> Result<()> {
    let checksum = file_checksum(path)?;
    tracing::info!("Classifier {} sha256={}", display_name(path), checksum);
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_to_string(path)?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}
