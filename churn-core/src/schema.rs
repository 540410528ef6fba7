//! Customer Schema - Request shape and validation
//!
//! `RawCustomerRecord` is the record as it arrives on the wire (every field
//! optional, external names). `CustomerRecord` only exists after every field
//! passed its constraint, so nothing downstream has to re-check bounds.
//!
//! The constraint set is a declarative table: one row per external field.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// EXTERNAL FIELD NAMES
// ============================================================================

pub const CALL_FAILURE: &str = "Call_Failure";
pub const COMPLAINS: &str = "Complains";
pub const SUBSCRIPTION_LENGTH: &str = "Subscription_Length";
pub const CHARGE_AMOUNT: &str = "Charge_Amount";
pub const SECONDS_OF_USE: &str = "Seconds_of_Use";
pub const FREQUENCY_OF_USE: &str = "Frequency_of_use";
pub const FREQUENCY_OF_SMS: &str = "Frequency_of_SMS";
pub const DISTINCT_CALLED_NUMBERS: &str = "Distinct_Called_Numbers";
pub const AGE_GROUP: &str = "Age_Group";
pub const TARIFF_PLAN: &str = "Tariff_Plan";
pub const STATUS: &str = "Status";
pub const AGE: &str = "Age";
pub const CUSTOMER_VALUE: &str = "Customer_Value";

/// Number of attributes in a customer record
pub const FIELD_COUNT: usize = 13;

// ============================================================================
// CONSTRAINT TABLE
// ============================================================================

/// Allowed values for one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// `value >= 0`
    NonNegative,
    /// `min <= value <= max`
    Between(i64, i64),
    /// Enumerated codes
    OneOf(&'static [i64]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConstraint {
    pub field: &'static str,
    pub integer: bool,
    pub domain: Domain,
}

const fn integer(field: &'static str, domain: Domain) -> FieldConstraint {
    FieldConstraint { field, integer: true, domain }
}

const fn real(field: &'static str, domain: Domain) -> FieldConstraint {
    FieldConstraint { field, integer: false, domain }
}

/// Per-field constraints, in external declaration order
pub const FIELD_CONSTRAINTS: [FieldConstraint; FIELD_COUNT] = [
    integer(CALL_FAILURE, Domain::NonNegative),
    integer(COMPLAINS, Domain::OneOf(&[0, 1])),
    real(SUBSCRIPTION_LENGTH, Domain::NonNegative),
    integer(CHARGE_AMOUNT, Domain::Between(0, 9)),
    real(SECONDS_OF_USE, Domain::NonNegative),
    real(FREQUENCY_OF_USE, Domain::NonNegative),
    real(FREQUENCY_OF_SMS, Domain::NonNegative),
    integer(DISTINCT_CALLED_NUMBERS, Domain::NonNegative),
    integer(AGE_GROUP, Domain::Between(1, 5)),
    integer(TARIFF_PLAN, Domain::OneOf(&[1, 2])),
    integer(STATUS, Domain::OneOf(&[1, 2])),
    integer(AGE, Domain::Between(0, 120)),
    real(CUSTOMER_VALUE, Domain::NonNegative),
];

/// Integer counts are stored as `u32`
const MAX_COUNT: f64 = u32::MAX as f64;

impl FieldConstraint {
    /// Check one value, returning the violation message on failure
    pub fn check(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err("must be a finite number".to_string());
        }
        if self.integer && value.fract() != 0.0 {
            return Err(format!("must be an integer (got {})", value));
        }

        match self.domain {
            Domain::NonNegative if value < 0.0 => {
                Err(format!("must be greater than or equal to 0 (got {})", value))
            }
            Domain::NonNegative if self.integer && value > MAX_COUNT => {
                Err(format!("must not exceed {} (got {})", u32::MAX, value))
            }
            Domain::Between(min, max) if value < min as f64 || value > max as f64 => {
                Err(format!("must be between {} and {} (got {})", min, max, value))
            }
            Domain::OneOf(codes) if !codes.iter().any(|&c| c as f64 == value) => {
                let allowed: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
                Err(format!("must be one of {} (got {})", allowed.join(", "), value))
            }
            _ => Ok(()),
        }
    }
}

/// Look up the constraint for an external field name
pub fn constraint_for(field: &str) -> Option<&'static FieldConstraint> {
    FIELD_CONSTRAINTS.iter().find(|c| c.field == field)
}

// ============================================================================
// VALIDATION REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Aggregated report covering every violated field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut report = Self::default();
        report.push(field, message);
        report
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether any violation concerns `field`
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, v) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{} {}", sep, v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

// ============================================================================
// CATEGORICAL FIELDS
// ============================================================================

/// Age category 1-5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeGroup(u8);

impl AgeGroup {
    pub fn new(group: u8) -> Option<Self> {
        (1..=5).contains(&group).then_some(Self(group))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TariffPlan {
    PayAsYouGo = 1,
    Contractual = 2,
}

impl TariffPlan {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::PayAsYouGo),
            2 => Some(Self::Contractual),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountStatus {
    Active = 1,
    NonActive = 2,
}

impl AccountStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Active),
            2 => Some(Self::NonActive),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

// ============================================================================
// RAW RECORD (wire shape)
// ============================================================================

/// Customer record as received; absent fields stay `None` so that every
/// missing field can be reported at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCustomerRecord {
    #[serde(rename = "Call_Failure", skip_serializing_if = "Option::is_none")]
    pub call_failure: Option<f64>,
    #[serde(rename = "Complains", skip_serializing_if = "Option::is_none")]
    pub complains: Option<f64>,
    #[serde(rename = "Subscription_Length", skip_serializing_if = "Option::is_none")]
    pub subscription_length: Option<f64>,
    #[serde(rename = "Charge_Amount", skip_serializing_if = "Option::is_none")]
    pub charge_amount: Option<f64>,
    #[serde(rename = "Seconds_of_Use", skip_serializing_if = "Option::is_none")]
    pub seconds_of_use: Option<f64>,
    #[serde(rename = "Frequency_of_use", skip_serializing_if = "Option::is_none")]
    pub frequency_of_use: Option<f64>,
    #[serde(rename = "Frequency_of_SMS", skip_serializing_if = "Option::is_none")]
    pub frequency_of_sms: Option<f64>,
    #[serde(rename = "Distinct_Called_Numbers", skip_serializing_if = "Option::is_none")]
    pub distinct_called_numbers: Option<f64>,
    #[serde(rename = "Age_Group", skip_serializing_if = "Option::is_none")]
    pub age_group: Option<f64>,
    #[serde(rename = "Tariff_Plan", skip_serializing_if = "Option::is_none")]
    pub tariff_plan: Option<f64>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<f64>,
    #[serde(rename = "Age", skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(rename = "Customer_Value", skip_serializing_if = "Option::is_none")]
    pub customer_value: Option<f64>,
}

impl RawCustomerRecord {
    /// Fields with their external names, in declaration order
    pub fn fields(&self) -> [(&'static str, Option<f64>); FIELD_COUNT] {
        [
            (CALL_FAILURE, self.call_failure),
            (COMPLAINS, self.complains),
            (SUBSCRIPTION_LENGTH, self.subscription_length),
            (CHARGE_AMOUNT, self.charge_amount),
            (SECONDS_OF_USE, self.seconds_of_use),
            (FREQUENCY_OF_USE, self.frequency_of_use),
            (FREQUENCY_OF_SMS, self.frequency_of_sms),
            (DISTINCT_CALLED_NUMBERS, self.distinct_called_numbers),
            (AGE_GROUP, self.age_group),
            (TARIFF_PLAN, self.tariff_plan),
            (STATUS, self.status),
            (AGE, self.age),
            (CUSTOMER_VALUE, self.customer_value),
        ]
    }

    /// Validate every field, reporting all violations together
    pub fn validate(&self) -> Result<CustomerRecord, ValidationReport> {
        let mut report = ValidationReport::default();
        match self.validate_into("", &mut report) {
            Some(record) => Ok(record),
            None => Err(report),
        }
    }

    /// Validate, appending violations to `report` with field paths prefixed
    /// by `prefix` (e.g. `customers[3].`)
    pub(crate) fn validate_into(
        &self,
        prefix: &str,
        report: &mut ValidationReport,
    ) -> Option<CustomerRecord> {
        let before = report.len();

        for (field, value) in self.fields() {
            let Some(constraint) = constraint_for(field) else {
                continue;
            };
            match value {
                None => report.push(format!("{}{}", prefix, field), "field required"),
                Some(v) => {
                    if let Err(msg) = constraint.check(v) {
                        report.push(format!("{}{}", prefix, field), msg);
                    }
                }
            }
        }

        if report.len() > before {
            return None;
        }

        let record = self.build();
        if record.is_none() {
            report.push(prefix.trim_end_matches('.'), "record could not be converted");
        }
        record
    }

    /// Convert checked values into the typed record
    fn build(&self) -> Option<CustomerRecord> {
        Some(CustomerRecord {
            call_failure: self.call_failure? as u32,
            complains: self.complains? == 1.0,
            subscription_length: self.subscription_length?,
            charge_amount: self.charge_amount? as u8,
            seconds_of_use: self.seconds_of_use?,
            frequency_of_use: self.frequency_of_use?,
            frequency_of_sms: self.frequency_of_sms?,
            distinct_called_numbers: self.distinct_called_numbers? as u32,
            age_group: AgeGroup::new(self.age_group? as u8)?,
            tariff_plan: TariffPlan::from_code(self.tariff_plan? as i64)?,
            status: AccountStatus::from_code(self.status? as i64)?,
            age: self.age? as u8,
            customer_value: self.customer_value?,
        })
    }
}

// ============================================================================
// VALIDATED RECORD
// ============================================================================

/// A customer record whose every field is present and within bounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub call_failure: u32,
    pub complains: bool,
    pub subscription_length: f64,
    pub charge_amount: u8,
    pub seconds_of_use: f64,
    pub frequency_of_use: f64,
    pub frequency_of_sms: f64,
    pub distinct_called_numbers: u32,
    pub age_group: AgeGroup,
    pub tariff_plan: TariffPlan,
    pub status: AccountStatus,
    pub age: u8,
    pub customer_value: f64,
}

impl CustomerRecord {
    /// Numeric encoding of every field under its external name
    pub fn fields(&self) -> [(&'static str, f64); FIELD_COUNT] {
        [
            (CALL_FAILURE, self.call_failure as f64),
            (COMPLAINS, if self.complains { 1.0 } else { 0.0 }),
            (SUBSCRIPTION_LENGTH, self.subscription_length),
            (CHARGE_AMOUNT, self.charge_amount as f64),
            (SECONDS_OF_USE, self.seconds_of_use),
            (FREQUENCY_OF_USE, self.frequency_of_use),
            (FREQUENCY_OF_SMS, self.frequency_of_sms),
            (DISTINCT_CALLED_NUMBERS, self.distinct_called_numbers as f64),
            (AGE_GROUP, self.age_group.get() as f64),
            (TARIFF_PLAN, self.tariff_plan.code() as f64),
            (STATUS, self.status.code() as f64),
            (AGE, self.age as f64),
            (CUSTOMER_VALUE, self.customer_value),
        ]
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::valid_customer;

    #[test]
    fn test_every_field_has_a_constraint() {
        let record = RawCustomerRecord::default();
        for (field, _) in record.fields() {
            assert!(constraint_for(field).is_some(), "no constraint for {}", field);
        }
        assert_eq!(FIELD_CONSTRAINTS.len(), FIELD_COUNT);
    }

    #[test]
    fn test_wire_names_match_constraint_table() {
        let json = serde_json::to_value(valid_customer()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for constraint in &FIELD_CONSTRAINTS {
            assert!(keys.contains(&constraint.field), "{} not on the wire", constraint.field);
        }
    }

    #[test]
    fn test_valid_record_passes() {
        let record = valid_customer().validate().unwrap();
        assert_eq!(record.call_failure, 8);
        assert!(!record.complains);
        assert_eq!(record.age_group.get(), 3);
        assert_eq!(record.tariff_plan, TariffPlan::PayAsYouGo);
        assert_eq!(record.status, AccountStatus::Active);
        assert_eq!(record.age, 30);
        assert_eq!(record.customer_value, 197.64);
    }

    #[test]
    fn test_age_out_of_range() {
        let mut raw = valid_customer();
        raw.age = Some(150.0);

        let report = raw.validate().unwrap_err();
        assert_eq!(report.len(), 1);
        assert!(report.mentions(AGE));
    }

    #[test]
    fn test_missing_field() {
        let mut raw = valid_customer();
        raw.call_failure = None;

        let report = raw.validate().unwrap_err();
        assert_eq!(report.violations[0].field, CALL_FAILURE);
        assert_eq!(report.violations[0].message, "field required");
    }

    #[test]
    fn test_all_violations_reported_together() {
        let mut raw = valid_customer();
        raw.complains = Some(2.0);
        raw.age_group = Some(6.0);
        raw.tariff_plan = None;
        raw.seconds_of_use = Some(-1.0);

        let report = raw.validate().unwrap_err();
        assert_eq!(report.len(), 4);
        assert!(report.mentions(COMPLAINS));
        assert!(report.mentions(AGE_GROUP));
        assert!(report.mentions(TARIFF_PLAN));
        assert!(report.mentions(SECONDS_OF_USE));
    }

    #[test]
    fn test_empty_record_reports_every_field() {
        let report = RawCustomerRecord::default().validate().unwrap_err();
        assert_eq!(report.len(), FIELD_COUNT);
    }

    #[test]
    fn test_integer_fields_reject_fractions() {
        let mut raw = valid_customer();
        raw.distinct_called_numbers = Some(2.5);
        let report = raw.validate().unwrap_err();
        assert!(report.violations[0].message.contains("integer"));

        // Real-valued fields accept fractions
        let mut raw = valid_customer();
        raw.subscription_length = Some(2.5);
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn test_boundaries() {
        let cases = [
            (AGE, 0.0, true),
            (AGE, 120.0, true),
            (AGE, 121.0, false),
            (CHARGE_AMOUNT, 9.0, true),
            (CHARGE_AMOUNT, 10.0, false),
            (AGE_GROUP, 1.0, true),
            (AGE_GROUP, 0.0, false),
            (STATUS, 2.0, true),
            (STATUS, 3.0, false),
            (CALL_FAILURE, -1.0, false),
            (CALL_FAILURE, 5e10, false),
        ];
        for (field, value, ok) in cases {
            let constraint = constraint_for(field).unwrap();
            assert_eq!(constraint.check(value).is_ok(), ok, "{} = {}", field, value);
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let constraint = constraint_for(CUSTOMER_VALUE).unwrap();
        assert!(constraint.check(f64::NAN).is_err());
        assert!(constraint.check(f64::INFINITY).is_err());
    }

    #[test]
    fn test_prefixed_field_paths() {
        let mut raw = valid_customer();
        raw.age = Some(150.0);

        let mut report = ValidationReport::default();
        assert!(raw.validate_into("customers[3].", &mut report).is_none());
        assert_eq!(report.violations[0].field, "customers[3].Age");
    }

    #[test]
    fn test_deserialize_ignores_unknown_fields() {
        let json = serde_json::json!({ "Age": 30, "Churn": 1 });
        let raw: RawCustomerRecord = serde_json::from_value(json).unwrap();
        assert_eq!(raw.age, Some(30.0));
        assert_eq!(raw.call_failure, None);
    }

    #[test]
    fn test_report_display() {
        let mut report = ValidationReport::single(AGE, "must be between 0 and 120 (got 150)");
        report.push(COMPLAINS, "field required");
        assert_eq!(
            report.to_string(),
            "validation failed: Age must be between 0 and 120 (got 150); Complains field required"
        );
    }
}
