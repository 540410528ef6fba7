//! Artifact Bundle - Fitted classifier plus its training context
//!
//! Built once from deserialized artifacts, then shared read-only.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classifier::Classifier;
use crate::error::BundleError;
use crate::features::layout_hash;

/// Training metadata produced alongside the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub cv_accuracy: f64,
    pub cv_std: f64,
    pub test_accuracy: f64,
    pub model_type: String,
    pub feature_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_reference: Option<String>,
}

/// Immutable {classifier, feature names, metadata}
pub struct ArtifactBundle {
    classifier: Box<dyn Classifier>,
    feature_names: Vec<String>,
    metadata: ModelMetadata,
    layout_hash: u32,
    loaded_at: DateTime<Utc>,
}

impl ArtifactBundle {
    /// Check that the three artifacts agree with each other
    pub fn new(
        classifier: Box<dyn Classifier>,
        feature_names: Vec<String>,
        metadata: ModelMetadata,
    ) -> Result<Self, BundleError> {
        if feature_names.is_empty() {
            return Err(BundleError::EmptyFeatureList);
        }

        let mut seen = HashSet::new();
        for name in &feature_names {
            if !seen.insert(name.as_str()) {
                return Err(BundleError::DuplicateFeature(name.clone()));
            }
        }

        if metadata.feature_count != feature_names.len() {
            return Err(BundleError::FeatureCountMismatch {
                declared: metadata.feature_count,
                actual: feature_names.len(),
            });
        }

        if let Some(expected) = classifier.n_features() {
            if expected != feature_names.len() {
                return Err(BundleError::ClassifierWidth {
                    expected,
                    actual: feature_names.len(),
                });
            }
        }

        let layout_hash = layout_hash(&feature_names);

        Ok(Self {
            classifier,
            feature_names,
            metadata,
            layout_hash,
            loaded_at: Utc::now(),
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("backend", &self.classifier.backend())
            .field("feature_names", &self.feature_names)
            .field("metadata", &self.metadata)
            .field("layout_hash", &format_args!("{:08x}", self.layout_hash))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogisticClassifier;
    use crate::test_support::{fixture_feature_names, fixture_metadata};

    fn logistic(width: usize) -> Box<dyn Classifier> {
        Box::new(LogisticClassifier::new(0.0, vec![0.0; width]))
    }

    #[test]
    fn test_bundle_from_fixture() {
        let names = fixture_feature_names();
        let bundle = ArtifactBundle::new(logistic(13), names.clone(), fixture_metadata()).unwrap();

        assert_eq!(bundle.feature_count(), 13);
        assert_eq!(bundle.feature_names(), names.as_slice());
        assert_eq!(bundle.layout_hash(), layout_hash(&names));
        assert_eq!(bundle.metadata().model_type, "LogisticRegression");
    }

    #[test]
    fn test_metadata_optional_fields() {
        let bare: ModelMetadata = serde_json::from_str(
            r#"{"cv_accuracy":0.9,"cv_std":0.01,"test_accuracy":0.9,
                "model_type":"LGBMClassifier","feature_count":13}"#,
        )
        .unwrap();
        assert_eq!(bare.dataset, None);
        assert_eq!(bare.paper_reference, None);

        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("paper_reference").is_none());
        assert!(fixture_metadata().paper_reference.is_some());
    }

    #[test]
    fn test_reject_empty_feature_list() {
        let mut metadata = fixture_metadata();
        metadata.feature_count = 0;
        let err = ArtifactBundle::new(logistic(0), vec![], metadata).unwrap_err();
        assert_eq!(err, BundleError::EmptyFeatureList);
    }

    #[test]
    fn test_reject_duplicate_feature() {
        let mut names = fixture_feature_names();
        names[1] = names[0].clone();
        let err = ArtifactBundle::new(logistic(13), names, fixture_metadata()).unwrap_err();
        assert_eq!(err, BundleError::DuplicateFeature("Call  Failure".to_string()));
    }

    #[test]
    fn test_reject_metadata_count_mismatch() {
        let mut metadata = fixture_metadata();
        metadata.feature_count = 12;
        let err = ArtifactBundle::new(logistic(13), fixture_feature_names(), metadata).unwrap_err();
        assert_eq!(err, BundleError::FeatureCountMismatch { declared: 12, actual: 13 });
    }

    #[test]
    fn test_reject_classifier_width_mismatch() {
        let err = ArtifactBundle::new(logistic(10), fixture_feature_names(), fixture_metadata())
            .unwrap_err();
        assert_eq!(err, BundleError::ClassifierWidth { expected: 10, actual: 13 });
    }
}
