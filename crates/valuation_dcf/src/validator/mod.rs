//! Independent arithmetic audit of computed scenario results.
//!
//! The validator recomputes every formula of a [`ScenarioOutcome`] from
//! the stated inputs and flags disagreements beyond explicit tolerances.
//! It operates only on already-computed output, never mutates it, and
//! never raises: the result is always a structured [`ValidationReport`].
//!
//! A separate [`independent_value`] recomputation exists as a sanity
//! oracle: it rebuilds the full scenario equity value from raw assumptions
//! in a single self-contained pass, without sharing code with the main
//! pipeline's row construction.

mod checks;
mod report;

pub use report::{Finding, Severity, ValidationReport};

use valuation_core::math::{clamp_growth_rate, clamp_margin};
use valuation_core::types::{
    BaselineFinancials, CompanyProfile, ScenarioAssumptions, ScenarioError, ScenarioKind,
    ScenarioOutcome,
};

/// Plausible WACC range; outside is an error.
pub const WACC_RANGE: (f64, f64) = (0.03, 0.30);

/// Plausible terminal growth range; outside is an error.
pub const TERMINAL_GROWTH_RANGE: (f64, f64) = (-0.02, 0.06);

/// Per-year revenue growth plausibility range; outside is a warning.
pub const GROWTH_WARN_RANGE: (f64, f64) = (-0.50, 2.00);

/// Per-year EBITDA margin plausibility range; outside is a warning.
pub const MARGIN_WARN_RANGE: (f64, f64) = (-0.50, 0.80);

/// Market range for the implied EV/Revenue multiple; outside is a warning.
pub const EV_REVENUE_RANGE: (f64, f64) = (0.2, 15.0);

/// Plausible average FCF margin range; outside is a warning.
pub const FCF_MARGIN_RANGE: (f64, f64) = (-0.30, 0.40);

/// Tolerance for the revenue recomputation.
pub const TOL_REVENUE: f64 = 0.05;

/// Tolerance for the EBITDA recomputation.
pub const TOL_EBITDA: f64 = 0.05;

/// Tolerance for the terminal value recomputation.
pub const TOL_TERMINAL_VALUE: f64 = 0.05;

/// Tolerance for the discount factor recomputation.
pub const TOL_DISCOUNT_FACTOR: f64 = 0.01;

/// Tolerance for the enterprise value recomputation.
pub const TOL_ENTERPRISE_VALUE: f64 = 0.01;

/// Tolerance for the equity value recomputation.
pub const TOL_EQUITY_VALUE: f64 = 0.01;

/// Tolerance for the NOPAT identity.
pub const TOL_NOPAT: f64 = 0.02;

/// Tolerance for the FCF composition reconciliation (warning only).
pub const TOL_FCF_COMPOSITION: f64 = 0.05;

/// Tolerance for present-value identities.
pub const TOL_PRESENT_VALUE: f64 = 0.01;

/// Audit one computed scenario against its stated inputs.
///
/// Never raises. Returns a report whose `is_valid` is true iff no check
/// recorded an error; warnings and info findings never block validity.
pub fn validate_scenario(
    outcome: &ScenarioOutcome,
    assumptions: &ScenarioAssumptions,
    baseline: &BaselineFinancials,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    checks::check_rate_bounds(&mut report, outcome, assumptions);
    checks::check_year_ranges(&mut report, outcome);
    checks::check_revenue_and_ebitda(&mut report, outcome, assumptions, baseline);
    checks::check_terminal_value(&mut report, outcome);
    checks::check_discount_factors(&mut report, outcome, assumptions);
    checks::check_bridge(&mut report, outcome);
    checks::check_year_identities(&mut report, outcome, assumptions);
    checks::check_market_reasonableness(&mut report, outcome, baseline);

    report
}

/// Recompute a scenario's equity value from raw assumptions.
///
/// Self-contained single pass used as a cross-checking oracle; not part of
/// the main pipeline. Applies the same clamping and normalisation policies
/// as the pipeline so a healthy result agrees with
/// `ScenarioOutcome::bridge.equity_value` to numerical precision.
pub fn independent_value(
    kind: ScenarioKind,
    assumptions: &ScenarioAssumptions,
    baseline: &BaselineFinancials,
    profile: CompanyProfile,
) -> Result<f64, ScenarioError> {
    let horizon = profile.horizon();
    let wacc = assumptions.discount_rate;
    if !wacc.is_finite() || wacc <= -1.0 {
        return Err(ScenarioError::InvalidRate {
            scenario: kind,
            field: "discount_rate".to_string(),
            value: wacc,
        });
    }
    if !baseline.revenue.is_finite() || baseline.revenue <= 0.0 {
        return Err(ScenarioError::NonPositiveRevenue {
            scenario: kind,
            year: 0,
            revenue: baseline.revenue,
        });
    }
    let margins = assumptions
        .margins
        .resolve(horizon)
        .ok_or_else(|| ScenarioError::MissingAssumption {
            scenario: kind,
            field: "margins".to_string(),
        })?;

    let mut revenue = baseline.revenue;
    let mut wc_balance = baseline.working_capital;
    let mut npv = 0.0;
    let mut final_fcf = 0.0;
    let mut final_nopat = 0.0;
    let mut final_depreciation = 0.0;
    let mut final_revenue = 0.0;

    for year in 1..=horizon {
        let rate = assumptions
            .growth
            .rate_for_year(year - 1, horizon)
            .ok_or_else(|| ScenarioError::MissingAssumption {
                scenario: kind,
                field: "growth".to_string(),
            })?;
        revenue *= 1.0 + clamp_growth_rate(rate);
        if !revenue.is_finite() || revenue <= 0.0 {
            return Err(ScenarioError::NonPositiveRevenue {
                scenario: kind,
                year,
                revenue,
            });
        }

        let ebitda = revenue * clamp_margin(margins[year - 1]);
        let depreciation = revenue * assumptions.depreciation_rate;
        let ebit = ebitda - depreciation;
        let nopat = ebit - ebit.max(0.0) * assumptions.tax_rate;
        let capex = revenue * assumptions.capex_rate;
        let new_wc_balance = revenue * assumptions.working_capital_rate;
        let fcf = nopat + depreciation - capex - (new_wc_balance - wc_balance);
        wc_balance = new_wc_balance;

        npv += fcf * (1.0 + wacc).powi(-(year as i32));
        final_fcf = fcf;
        final_nopat = nopat;
        final_depreciation = depreciation;
        final_revenue = revenue;
    }

    let terminal_fcf = if final_fcf < 0.0 {
        let sustainable_capex_rate = (assumptions.capex_rate * 0.60).max(0.02);
        (final_nopat + final_depreciation
            - final_revenue * sustainable_capex_rate
            - final_revenue * 0.01)
            .max(0.0)
    } else {
        final_fcf
    };
    let growth = if assumptions.terminal_growth >= wacc {
        wacc - crate::terminal::TERMINAL_GROWTH_GAP
    } else {
        assumptions.terminal_growth
    };
    let terminal_value = terminal_fcf * (1.0 + growth) / (wacc - growth);
    let terminal_pv = terminal_value * (1.0 + wacc).powi(-(horizon as i32));

    Ok((npv + terminal_pv) * (1.0 - profile.marketability_discount()) - baseline.net_debt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DcfCalculator;
    use approx::assert_relative_eq;
    use valuation_core::types::{GrowthModel, MarginPath, ScenarioSet};

    fn worked_example() -> ScenarioAssumptions {
        ScenarioAssumptions {
            growth: GrowthModel::Explicit(vec![0.10; 5]),
            margins: MarginPath::Explicit(vec![0.20]),
            capex_rate: 0.05,
            working_capital_rate: 0.10,
            depreciation_rate: 0.04,
            terminal_growth: 0.03,
            discount_rate: 0.10,
            tax_rate: 0.25,
        }
    }

    fn baseline() -> BaselineFinancials {
        BaselineFinancials::new(1_000_000.0, 100_000.0, 0.0, 2025)
    }

    fn computed_outcome() -> ScenarioOutcome {
        let calculator = DcfCalculator::new(CompanyProfile::Established);
        let result = calculator.compute(&ScenarioSet::uniform(worked_example()), &baseline());
        result.base.unwrap()
    }

    #[test]
    fn test_worked_example_is_valid() {
        let outcome = computed_outcome();
        let report = validate_scenario(&outcome, &worked_example(), &baseline());

        assert!(report.is_valid, "errors: {:?}", report.errors);
        assert!(report.errors.is_empty());
        // no clamping occurred: 3% < 10%
        assert!(!report.has_finding("TERMINAL_GROWTH_CLAMPED"));
    }

    #[test]
    fn test_tampered_enterprise_value_is_flagged() {
        let mut outcome = computed_outcome();
        outcome.bridge.enterprise_value *= 1.5;

        let report = validate_scenario(&outcome, &worked_example(), &baseline());
        assert!(!report.is_valid);
        assert!(report.has_finding("ENTERPRISE_VALUE"));
        // the equity identity uses the stated (tampered) EV, so it breaks too
        assert!(report.has_finding("EQUITY_VALUE"));
    }

    #[test]
    fn test_tampered_revenue_is_flagged() {
        let mut outcome = computed_outcome();
        outcome.projections[2].revenue *= 1.2;

        let report = validate_scenario(&outcome, &worked_example(), &baseline());
        assert!(!report.is_valid);
        assert!(report.has_finding("REVENUE_RECOMPUTE"));
    }

    #[test]
    fn test_tampered_discount_factor_is_flagged() {
        let mut outcome = computed_outcome();
        outcome.projections[0].discount_factor = 0.5;

        let report = validate_scenario(&outcome, &worked_example(), &baseline());
        assert!(report.has_finding("DISCOUNT_FACTOR"));
        assert!(!report.is_valid);
    }

    #[test]
    fn test_out_of_range_wacc_is_an_error() {
        let mut assumptions = worked_example();
        assumptions.discount_rate = 0.45;
        let calculator = DcfCalculator::new(CompanyProfile::Established);
        let outcome = calculator
            .compute(&ScenarioSet::uniform(assumptions.clone()), &baseline())
            .base
            .unwrap();

        let report = validate_scenario(&outcome, &assumptions, &baseline());
        assert!(!report.is_valid);
        assert!(report.has_finding("WACC_RANGE"));
    }

    #[test]
    fn test_clamped_growth_is_error_plus_info() {
        let mut assumptions = worked_example();
        assumptions.terminal_growth = 0.12; // above the 10% WACC
        let calculator = DcfCalculator::new(CompanyProfile::Established);
        let outcome = calculator
            .compute(&ScenarioSet::uniform(assumptions.clone()), &baseline())
            .base
            .unwrap();

        let report = validate_scenario(&outcome, &assumptions, &baseline());
        // the stated assumption violates the ordering (and the range)
        assert!(report.has_finding("GROWTH_VS_WACC"));
        assert!(report.has_finding("TERMINAL_GROWTH_CLAMPED"));
        // the engine's clamp kept the used rate consistent
        assert!(!report.has_finding("GROWTH_VS_WACC_USED"));
    }

    #[test]
    fn test_validator_never_mutates() {
        let outcome = computed_outcome();
        let copy = outcome.clone();
        let _ = validate_scenario(&outcome, &worked_example(), &baseline());
        assert_eq!(outcome, copy);
    }

    #[test]
    fn test_independent_value_matches_pipeline() {
        let outcome = computed_outcome();
        let oracle = independent_value(
            ScenarioKind::Base,
            &worked_example(),
            &baseline(),
            CompanyProfile::Established,
        )
        .unwrap();

        assert_relative_eq!(oracle, outcome.bridge.equity_value, epsilon = 1e-6);
    }

    #[test]
    fn test_independent_value_propagates_scenario_errors() {
        let mut assumptions = worked_example();
        assumptions.margins = MarginPath::Explicit(Vec::new());

        let err = independent_value(
            ScenarioKind::Pessimistic,
            &assumptions,
            &baseline(),
            CompanyProfile::Established,
        )
        .unwrap_err();
        assert_eq!(err.scenario(), ScenarioKind::Pessimistic);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_report_serialises() {
        let outcome = computed_outcome();
        let report = validate_scenario(&outcome, &worked_example(), &baseline());
        let json = serde_json::to_string(&report).unwrap();
        let back: ValidationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }
}
