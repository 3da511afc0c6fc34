//! Phone number normalization and validation.

use serde::Deserialize;

/// Digits in a subscriber number once the trunk prefix or country code is
/// removed.
const SUBSCRIBER_DIGITS: usize = 9;

/// National numbering plan used to canonicalize phone numbers.
///
/// Passed in from configuration so tests can run against a fixed plan
/// without touching the environment. The default is Ghana.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberPlan {
    /// Country calling code without the plus sign (e.g. "233").
    pub country_code: String,

    /// National trunk prefix (e.g. "0").
    pub trunk_prefix: String,
}

impl Default for NumberPlan {
    fn default() -> Self {
        Self {
            country_code: "233".into(),
            trunk_prefix: "0".into(),
        }
    }
}

impl NumberPlan {
    /// Create a plan from explicit constants.
    pub fn new(country_code: impl Into<String>, trunk_prefix: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            trunk_prefix: trunk_prefix.into(),
        }
    }

    fn local_len(&self) -> usize {
        self.trunk_prefix.len() + SUBSCRIBER_DIGITS
    }

    fn international_len(&self) -> usize {
        self.country_code.len() + SUBSCRIBER_DIGITS
    }

    /// Normalize a raw phone number to canonical form.
    ///
    /// Handles `+233XXXXXXXXX`, `0XXXXXXXXX`, `233XXXXXXXXX` and bare
    /// nine-digit subscriber numbers. Digit strings of any other shape
    /// pass through stripped but otherwise unvalidated, which can admit
    /// malformed canonical numbers; `validate` is the registration-time
    /// gate. Never fails; empty input yields an empty string.
    pub fn normalize(&self, raw: &str) -> String {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.starts_with(&self.trunk_prefix) && digits.len() == self.local_len() {
            format!("{}{}", self.country_code, &digits[self.trunk_prefix.len()..])
        } else if digits.starts_with(&self.country_code) && digits.len() == self.international_len()
        {
            digits
        } else if digits.len() == SUBSCRIBER_DIGITS {
            format!("{}{}", self.country_code, digits)
        } else {
            digits
        }
    }

    /// Check whether a raw phone number is acceptable for registration.
    ///
    /// Kept separate from `normalize` so acceptability policy can change
    /// without blocking normalization.
    pub fn validate(&self, raw: &str) -> Result<(), String> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.len() < SUBSCRIBER_DIGITS || digits.len() > self.international_len() {
            return Err(format!(
                "Phone number must be {}-{} digits",
                SUBSCRIBER_DIGITS,
                self.international_len()
            ));
        }

        if digits.starts_with(&self.trunk_prefix) {
            if digits.len() != self.local_len() {
                return Err(format!(
                    "Local numbers should be {} digits (e.g., 0551234567)",
                    self.local_len()
                ));
            }
        } else if digits.starts_with(&self.country_code) && digits.len() != self.international_len()
        {
            return Err(format!(
                "International format should be {} digits (e.g., 233551234567)",
                self.international_len()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_format() {
        let plan = NumberPlan::default();
        assert_eq!(plan.normalize("0551234567"), "233551234567");
    }

    #[test]
    fn test_normalize_international_format() {
        let plan = NumberPlan::default();
        assert_eq!(plan.normalize("+233551234567"), "233551234567");
        assert_eq!(plan.normalize("233551234567"), "233551234567");
    }

    #[test]
    fn test_normalize_bare_subscriber_number() {
        let plan = NumberPlan::default();
        assert_eq!(plan.normalize("551234567"), "233551234567");
    }

    #[test]
    fn test_normalize_strips_formatting() {
        let plan = NumberPlan::default();
        assert_eq!(plan.normalize("+233 55 123-4567"), "233551234567");
        assert_eq!(plan.normalize("055 123 4567"), "233551234567");
    }

    #[test]
    fn test_normalize_empty_input() {
        let plan = NumberPlan::default();
        assert_eq!(plan.normalize(""), "");
        assert_eq!(plan.normalize("no digits here"), "");
    }

    #[test]
    fn test_normalize_unrecognized_shape_passes_through() {
        let plan = NumberPlan::default();
        // 11 digits, neither local nor international shape
        assert_eq!(plan.normalize("05512345678"), "05512345678");
        assert_eq!(plan.normalize("12345"), "12345");
    }

    #[test]
    fn test_validate_accepts_known_shapes() {
        let plan = NumberPlan::default();
        assert!(plan.validate("0551234567").is_ok());
        assert!(plan.validate("+233551234567").is_ok());
        assert!(plan.validate("551234567").is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_digit_count() {
        let plan = NumberPlan::default();
        let err = plan.validate("12345").unwrap_err();
        assert!(err.contains("9-12 digits"));
        assert!(plan.validate("2335512345678").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_local_length() {
        let plan = NumberPlan::default();
        let err = plan.validate("055123456").unwrap_err();
        assert!(err.contains("Local numbers"));
    }

    #[test]
    fn test_validate_rejects_bad_international_length() {
        let plan = NumberPlan::default();
        let err = plan.validate("23355123456").unwrap_err();
        assert!(err.contains("International format"));
    }

    #[test]
    fn test_custom_plan() {
        let plan = NumberPlan::new("234", "0");
        assert_eq!(plan.normalize("0551234567"), "234551234567");
        assert_eq!(plan.normalize("551234567"), "234551234567");
    }
}
