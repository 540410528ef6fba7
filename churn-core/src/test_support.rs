//! Shared fixtures for unit tests

use crate::model::{ArtifactBundle, LogisticClassifier, ModelMetadata};
use crate::schema::RawCustomerRecord;

const FIXTURE_MODEL: &str = include_str!("../../fixtures/artifacts/churn_model.json");
const FIXTURE_FEATURES: &str = include_str!("../../fixtures/artifacts/feature_names.json");
const FIXTURE_METADATA: &str = include_str!("../../fixtures/artifacts/model_metadata.json");

/// Low-usage-risk profile
pub fn valid_customer() -> RawCustomerRecord {
    RawCustomerRecord {
        call_failure: Some(8.0),
        complains: Some(0.0),
        subscription_length: Some(38.0),
        charge_amount: Some(0.0),
        seconds_of_use: Some(4370.0),
        frequency_of_use: Some(71.0),
        frequency_of_sms: Some(5.0),
        distinct_called_numbers: Some(17.0),
        age_group: Some(3.0),
        tariff_plan: Some(1.0),
        status: Some(1.0),
        age: Some(30.0),
        customer_value: Some(197.64),
    }
}

/// Complaining, barely active, many call failures
pub fn high_risk_customer() -> RawCustomerRecord {
    RawCustomerRecord {
        call_failure: Some(20.0),
        complains: Some(1.0),
        subscription_length: Some(2.0),
        charge_amount: Some(0.0),
        seconds_of_use: Some(100.0),
        frequency_of_use: Some(5.0),
        frequency_of_sms: Some(0.0),
        distinct_called_numbers: Some(2.0),
        age_group: Some(2.0),
        tariff_plan: Some(1.0),
        status: Some(1.0),
        age: Some(25.0),
        customer_value: Some(10.0),
    }
}

pub fn fixture_feature_names() -> Vec<String> {
    serde_json::from_str(FIXTURE_FEATURES).unwrap()
}

pub fn fixture_metadata() -> ModelMetadata {
    serde_json::from_str(FIXTURE_METADATA).unwrap()
}

pub fn fixture_classifier() -> LogisticClassifier {
    LogisticClassifier::from_json(FIXTURE_MODEL).unwrap()
}

pub fn fixture_bundle() -> ArtifactBundle {
    ArtifactBundle::new(
        Box::new(fixture_classifier()),
        fixture_feature_names(),
        fixture_metadata(),
    )
    .unwrap()
}
