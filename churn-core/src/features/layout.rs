//! Feature Layout - Field name translation
//!
//! **This table controls how request fields reach the model**
//!
//! ## Rules:
//! 1. Change any entry → increment TRANSLATION_VERSION
//! 2. Training labels are copied verbatim from the training dataset,
//!    including the double spaces. Never "fix" them here.

use crc32fast::Hasher;

use crate::schema::{
    AGE, AGE_GROUP, CALL_FAILURE, CHARGE_AMOUNT, COMPLAINS, CUSTOMER_VALUE,
    DISTINCT_CALLED_NUMBERS, FIELD_COUNT, FREQUENCY_OF_SMS, FREQUENCY_OF_USE, SECONDS_OF_USE,
    STATUS, SUBSCRIPTION_LENGTH, TARIFF_PLAN,
};

// ============================================================================
// TRANSLATION TABLE
// ============================================================================

/// Current translation table version
pub const TRANSLATION_VERSION: u8 = 1;

/// External field name → training-time feature label
pub const FIELD_TRANSLATIONS: [(&str, &str); FIELD_COUNT] = [
    (CALL_FAILURE, "Call  Failure"),
    (COMPLAINS, "Complains"),
    (SUBSCRIPTION_LENGTH, "Subscription  Length"),
    (CHARGE_AMOUNT, "Charge  Amount"),
    (SECONDS_OF_USE, "Seconds of Use"),
    (FREQUENCY_OF_USE, "Frequency of use"),
    (FREQUENCY_OF_SMS, "Frequency of SMS"),
    (DISTINCT_CALLED_NUMBERS, "Distinct Called Numbers"),
    (AGE_GROUP, "Age Group"),
    (TARIFF_PLAN, "Tariff Plan"),
    (STATUS, "Status"),
    (AGE, "Age"),
    (CUSTOMER_VALUE, "Customer Value"),
];

/// Training label for an external field (identity if untranslated)
pub fn training_label(external: &str) -> &str {
    FIELD_TRANSLATIONS
        .iter()
        .find(|(from, _)| *from == external)
        .map(|(_, to)| *to)
        .unwrap_or(external)
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over an ordered feature-name list
///
/// Two bundles with the same hash expect the same columns in the same order.
pub fn layout_hash<S: AsRef<str>>(feature_names: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    for name in feature_names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_translation_is_one_to_one() {
        let from: HashSet<_> = FIELD_TRANSLATIONS.iter().map(|(f, _)| *f).collect();
        let to: HashSet<_> = FIELD_TRANSLATIONS.iter().map(|(_, t)| *t).collect();
        assert_eq!(from.len(), FIELD_COUNT);
        assert_eq!(to.len(), FIELD_COUNT);
    }

    #[test]
    fn test_irregular_spacing_preserved() {
        assert_eq!(training_label(CALL_FAILURE), "Call  Failure");
        assert_eq!(training_label(SUBSCRIPTION_LENGTH), "Subscription  Length");
        assert_eq!(training_label(CHARGE_AMOUNT), "Charge  Amount");
        assert_eq!(training_label(SECONDS_OF_USE), "Seconds of Use");
    }

    #[test]
    fn test_translations_cover_fixture_layout() {
        let names = crate::test_support::fixture_feature_names();
        assert_eq!(names.len(), FIELD_COUNT);
        for (_, label) in FIELD_TRANSLATIONS {
            assert!(names.iter().any(|n| n == label), "{} not in layout", label);
        }
    }

    #[test]
    fn test_untranslated_is_identity() {
        assert_eq!(training_label("Something_Else"), "Something_Else");
    }

    #[test]
    fn test_layout_hash_depends_on_order() {
        let a = layout_hash(&["Age", "Status"]);
        let b = layout_hash(&["Status", "Age"]);
        assert_ne!(a, b);
        assert_eq!(a, layout_hash(&["Age".to_string(), "Status".to_string()]));
    }

    #[test]
    fn test_layout_hash_separates_names() {
        assert_ne!(layout_hash(&["ab", "c"]), layout_hash(&["a", "bc"]));
    }
}
