//! Features Module - Feature Mapper
//!
//! Translates validated customer records into the exact ordered vectors the
//! classifier was trained on. Shared by the single and batch paths.

pub mod layout;
pub mod vector;

// Re-export common types
pub use layout::{layout_hash, training_label, FIELD_TRANSLATIONS, TRANSLATION_VERSION};
pub use vector::{feature_matrix, map_record, FeatureVector};
