//! Gate thresholds
//!
//! Every number a gate compares against lives here so deployments can tune
//! them from configuration. The defaults are the values the workshop
//! material has always used.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default minimum risk assignments
pub const DEFAULT_MIN_RISK_ASSIGNMENTS: usize = 1;
/// Default minimum stage assignments carrying a rationale
pub const DEFAULT_MIN_RATIONALE_ASSIGNMENTS: usize = 3;
/// Default minimum bias/mitigation pairs
pub const DEFAULT_MIN_CARD_PAIRS: usize = 2;
/// Default share of pairs that must carry a rating or note
pub const DEFAULT_PAIR_DOCUMENTATION_RATIO: f64 = 0.5;
/// Default share of stage assignments that should carry a rationale
pub const DEFAULT_RATIONALE_RATIO: f64 = 0.6;
/// Default number of distinct lifecycle stages that should be covered
pub const DEFAULT_MIN_LIFECYCLE_STAGES: usize = 3;

/// A ratio threshold outside 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{field} must be a ratio between 0 and 1, got {value}")]
pub struct ThresholdError {
    pub field: &'static str,
    pub value: f64,
}

/// Tunable gate thresholds
///
/// Deserialization fills missing fields with defaults and rejects ratios
/// that are not finite values in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct GateThresholds {
    pub min_risk_assignments: usize,
    pub min_rationale_assignments: usize,
    pub min_card_pairs: usize,
    pub pair_documentation_ratio: f64,
    pub rationale_ratio: f64,
    pub min_lifecycle_stages: usize,
}

impl GateThresholds {
    /// Default thresholds
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With minimum risk assignments
    #[inline]
    #[must_use]
    pub fn with_min_risk_assignments(mut self, n: usize) -> Self {
        self.min_risk_assignments = n;
        self
    }

    /// With minimum rationale assignments
    #[inline]
    #[must_use]
    pub fn with_min_rationale_assignments(mut self, n: usize) -> Self {
        self.min_rationale_assignments = n;
        self
    }

    /// With minimum pairs
    #[inline]
    #[must_use]
    pub fn with_min_card_pairs(mut self, n: usize) -> Self {
        self.min_card_pairs = n;
        self
    }

    /// With pair documentation ratio, clamped to 0.0..=1.0
    #[inline]
    #[must_use]
    pub fn with_pair_documentation_ratio(mut self, ratio: f64) -> Self {
        self.pair_documentation_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// With rationale ratio, clamped to 0.0..=1.0
    #[inline]
    #[must_use]
    pub fn with_rationale_ratio(mut self, ratio: f64) -> Self {
        self.rationale_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// With minimum lifecycle stage coverage
    #[inline]
    #[must_use]
    pub fn with_min_lifecycle_stages(mut self, n: usize) -> Self {
        self.min_lifecycle_stages = n;
        self
    }

    /// Check that both ratios lie in 0.0..=1.0
    ///
    /// # Errors
    /// Returns a [`ThresholdError`] naming the first offending ratio.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        check_ratio("pair_documentation_ratio", self.pair_documentation_ratio)?;
        check_ratio("rationale_ratio", self.rationale_ratio)
    }
}

fn check_ratio(field: &'static str, value: f64) -> Result<(), ThresholdError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ThresholdError { field, value })
    }
}

/// Wire form of [`GateThresholds`] before range checks
#[derive(Deserialize)]
#[serde(default)]
struct RawThresholds {
    min_risk_assignments: usize,
    min_rationale_assignments: usize,
    min_card_pairs: usize,
    pair_documentation_ratio: f64,
    rationale_ratio: f64,
    min_lifecycle_stages: usize,
}

impl Default for RawThresholds {
    fn default() -> Self {
        let t = GateThresholds::default();
        Self {
            min_risk_assignments: t.min_risk_assignments,
            min_rationale_assignments: t.min_rationale_assignments,
            min_card_pairs: t.min_card_pairs,
            pair_documentation_ratio: t.pair_documentation_ratio,
            rationale_ratio: t.rationale_ratio,
            min_lifecycle_stages: t.min_lifecycle_stages,
        }
    }
}

impl TryFrom<RawThresholds> for GateThresholds {
    type Error = ThresholdError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        let thresholds = Self {
            min_risk_assignments: raw.min_risk_assignments,
            min_rationale_assignments: raw.min_rationale_assignments,
            min_card_pairs: raw.min_card_pairs,
            pair_documentation_ratio: raw.pair_documentation_ratio,
            rationale_ratio: raw.rationale_ratio,
            min_lifecycle_stages: raw.min_lifecycle_stages,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            min_risk_assignments: DEFAULT_MIN_RISK_ASSIGNMENTS,
            min_rationale_assignments: DEFAULT_MIN_RATIONALE_ASSIGNMENTS,
            min_card_pairs: DEFAULT_MIN_CARD_PAIRS,
            pair_documentation_ratio: DEFAULT_PAIR_DOCUMENTATION_RATIO,
            rationale_ratio: DEFAULT_RATIONALE_RATIO,
            min_lifecycle_stages: DEFAULT_MIN_LIFECYCLE_STAGES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_are_clamped() {
        let t = GateThresholds::new()
            .with_pair_documentation_ratio(1.5)
            .with_rationale_ratio(-0.2);
        assert!((t.pair_documentation_ratio - 1.0).abs() < f64::EPSILON);
        assert!(t.rationale_ratio.abs() < f64::EPSILON);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn validate_names_the_bad_ratio() {
        let mut t = GateThresholds::new();
        t.rationale_ratio = f64::NAN;
        let err = t.validate().unwrap_err();
        assert_eq!(err.field, "rationale_ratio");

        t.rationale_ratio = 0.6;
        t.pair_documentation_ratio = 1.5;
        let err = t.validate().unwrap_err();
        assert_eq!(err.field, "pair_documentation_ratio");
        assert!(err.to_string().contains("between 0 and 1"));
    }
}
