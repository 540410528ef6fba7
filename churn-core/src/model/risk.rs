//! Risk Tiers - Churn probability bucketing
//!
//! Tiers are one ordered table of inclusive lower bounds, highest first.
//! Moving a threshold is a data edit.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (inclusive lower bound, tier), highest bound first
pub const RISK_TIERS: [(f64, RiskLevel); 3] = [
    (0.70, RiskLevel::High),
    (0.40, RiskLevel::Medium),
    (0.0, RiskLevel::Low),
];

/// Tier for a churn probability
pub fn risk_level(probability: f64) -> RiskLevel {
    RISK_TIERS
        .iter()
        .find(|(lower, _)| probability >= *lower)
        .map(|(_, tier)| *tier)
        .unwrap_or(RiskLevel::Low)
}
