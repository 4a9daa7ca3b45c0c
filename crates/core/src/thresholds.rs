//! Similarity thresholds used to classify script changes.
//!
//! Scores are integer percentages from [`crate::similarity::content_similarity`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// At or above this, a scene counts as unchanged ("Minor formatting changes"
/// when described).
pub const DEFAULT_UNCHANGED_THRESHOLD: u8 = 95;

/// At or above this, "Minor dialogue or action changes".
pub const DEFAULT_MINOR_THRESHOLD: u8 = 80;

/// At or above this, "Significant content changes"; below it, a rewrite.
pub const DEFAULT_SIGNIFICANT_THRESHOLD: u8 = 50;

/// Boundary scores for change classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeThresholds {
    pub unchanged: u8,
    pub minor: u8,
    pub significant: u8,
}

impl Default for ChangeThresholds {
    fn default() -> Self {
        Self {
            unchanged: DEFAULT_UNCHANGED_THRESHOLD,
            minor: DEFAULT_MINOR_THRESHOLD,
            significant: DEFAULT_SIGNIFICANT_THRESHOLD,
        }
    }
}

impl ChangeThresholds {
    /// Each value must be a percentage and `significant <= minor <= unchanged`.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_percent(self.unchanged, "unchanged_threshold")?;
        validate_percent(self.minor, "minor_threshold")?;
        validate_percent(self.significant, "significant_threshold")?;
        if self.significant > self.minor || self.minor > self.unchanged {
            return Err(CoreError::Validation(format!(
                "thresholds must satisfy significant <= minor <= unchanged, got {} / {} / {}",
                self.significant, self.minor, self.unchanged
            )));
        }
        Ok(())
    }
}

/// Validate that a value falls within `[0, 100]`.
pub fn validate_percent(value: u8, name: &str) -> Result<(), CoreError> {
    if value > 100 {
        return Err(CoreError::Validation(format!(
            "{name} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ChangeThresholds::default().validate().is_ok());
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(validate_percent(0, "test").is_ok());
        assert!(validate_percent(100, "test").is_ok());
    }

    #[test]
    fn rejects_above_hundred() {
        let err = validate_percent(101, "minor_threshold").unwrap_err();
        assert!(err.to_string().contains("minor_threshold"));
    }

    #[test]
    fn rejects_out_of_order_thresholds() {
        let thresholds = ChangeThresholds {
            unchanged: 90,
            minor: 92,
            significant: 50,
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn equal_thresholds_are_allowed() {
        let thresholds = ChangeThresholds {
            unchanged: 80,
            minor: 80,
            significant: 80,
        };
        assert!(thresholds.validate().is_ok());
    }
}
