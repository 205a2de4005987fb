//! Error types for structured error handling.
//!
//! This module provides:
//! - `ScenarioError`: Fatal, scenario-local failures of a DCF computation
//! - `RescaleError`: Inconsistent valuation snapshots handed to the
//!   rescaling engine
//!
//! Advisory findings (the validator's output) are plain data and are never
//! represented as errors; see `valuation_dcf::validator`.

use thiserror::Error;

use super::adjustment::ValuationMethod;
use super::scenario::ScenarioKind;

/// Fatal, scenario-local DCF computation errors.
///
/// A `ScenarioError` aborts exactly one scenario's calculation; the sibling
/// scenarios of the same run are unaffected and their results are still
/// returned. Every variant names the offending scenario and field so the
/// caller can surface a precise message.
///
/// # Examples
/// ```
/// use valuation_core::types::{ScenarioError, ScenarioKind};
///
/// let err = ScenarioError::NonPositiveRevenue {
///     scenario: ScenarioKind::Pessimistic,
///     year: 3,
///     revenue: -120_000.0,
/// };
/// assert!(format!("{}", err).contains("pessimistic"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScenarioError {
    /// A required intermediate value became non-finite.
    #[error("{scenario} scenario: non-finite {field} in projection year {year}")]
    NonFiniteValue {
        /// Scenario whose computation was aborted
        scenario: ScenarioKind,
        /// Name of the offending projection field
        field: String,
        /// 1-based projection year where the value broke down
        year: usize,
    },

    /// Projected revenue fell to zero or below.
    #[error("{scenario} scenario: revenue {revenue} is not positive in projection year {year}")]
    NonPositiveRevenue {
        /// Scenario whose computation was aborted
        scenario: ScenarioKind,
        /// 1-based projection year where revenue collapsed
        year: usize,
        /// The offending revenue value
        revenue: f64,
    },

    /// A required assumption was absent (e.g. an empty explicit rate list).
    #[error("{scenario} scenario: missing assumption `{field}`")]
    MissingAssumption {
        /// Scenario whose computation was aborted
        scenario: ScenarioKind,
        /// Name of the missing assumption
        field: String,
    },

    /// A rate input was structurally invalid (non-finite, or a WACC at or
    /// below -100% for which no discount factor exists).
    #[error("{scenario} scenario: invalid {field} ({value})")]
    InvalidRate {
        /// Scenario whose computation was aborted
        scenario: ScenarioKind,
        /// Name of the offending rate
        field: String,
        /// The offending value
        value: f64,
    },
}

impl ScenarioError {
    /// The scenario this error aborted.
    pub fn scenario(&self) -> ScenarioKind {
        match self {
            ScenarioError::NonFiniteValue { scenario, .. }
            | ScenarioError::NonPositiveRevenue { scenario, .. }
            | ScenarioError::MissingAssumption { scenario, .. }
            | ScenarioError::InvalidRate { scenario, .. } => *scenario,
        }
    }
}

/// Errors from the valuation rescaling engine.
///
/// Raised only when an [`super::adjustment::OriginalValuationSnapshot`] is
/// internally inconsistent: it claims a method was included in the original
/// average but carries no value or multiple for it. Degraded inputs that
/// are merely incomplete (a missing method-specific factor, no positive
/// method value) are handled by fallbacks instead.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RescaleError {
    /// The snapshot includes a method in its average but has no equity value
    /// recorded for it.
    #[error("snapshot includes {method} but records no equity value for it")]
    MissingMethodValue {
        /// The method with no recorded value
        method: ValuationMethod,
    },

    /// The snapshot includes a multiple-based method in its average but has
    /// no multiple recorded for it.
    #[error("snapshot includes {method} but records no multiple for it")]
    MissingMultiple {
        /// The method with no recorded multiple
        method: ValuationMethod,
    },

    /// The snapshot claims no methods were included in the original average.
    #[error("snapshot includes no valuation methods")]
    EmptySnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_revenue_display() {
        let err = ScenarioError::NonPositiveRevenue {
            scenario: ScenarioKind::Base,
            year: 2,
            revenue: 0.0,
        };
        assert_eq!(
            format!("{}", err),
            "base scenario: revenue 0 is not positive in projection year 2"
        );
    }

    #[test]
    fn test_non_finite_value_display() {
        let err = ScenarioError::NonFiniteValue {
            scenario: ScenarioKind::Optimistic,
            field: "free_cash_flow".to_string(),
            year: 5,
        };
        assert_eq!(
            format!("{}", err),
            "optimistic scenario: non-finite free_cash_flow in projection year 5"
        );
    }

    #[test]
    fn test_missing_assumption_display() {
        let err = ScenarioError::MissingAssumption {
            scenario: ScenarioKind::Base,
            field: "growth_rates".to_string(),
        };
        assert!(format!("{}", err).contains("growth_rates"));
    }

    #[test]
    fn test_scenario_accessor() {
        let err = ScenarioError::InvalidRate {
            scenario: ScenarioKind::Pessimistic,
            field: "discount_rate".to_string(),
            value: f64::NAN,
        };
        assert_eq!(err.scenario(), ScenarioKind::Pessimistic);
    }

    #[test]
    fn test_rescale_error_display() {
        let err = RescaleError::MissingMultiple {
            method: ValuationMethod::EbitdaMultiple,
        };
        assert!(format!("{}", err).contains("multiple"));

        let err = RescaleError::EmptySnapshot;
        assert_eq!(format!("{}", err), "snapshot includes no valuation methods");
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = ScenarioError::MissingAssumption {
            scenario: ScenarioKind::Base,
            field: "margins".to_string(),
        };
        let _: &dyn std::error::Error = &err;

        let err = RescaleError::EmptySnapshot;
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_clone_and_equality() {
        let err1 = ScenarioError::NonPositiveRevenue {
            scenario: ScenarioKind::Base,
            year: 1,
            revenue: -5.0,
        };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
