//! Individual validator checks.
//!
//! Every check recomputes a formula from the stated inputs and records a
//! finding when the result disagrees beyond the check's tolerance. Checks
//! only read; they never repair the result they audit.

use valuation_core::math::{clamp_growth_rate, clamp_margin, discount_factor, relative_diff};
use valuation_core::types::{BaselineFinancials, ScenarioAssumptions, ScenarioOutcome};

use super::report::{Finding, ValidationReport};
use super::{
    EV_REVENUE_RANGE, FCF_MARGIN_RANGE, GROWTH_WARN_RANGE, MARGIN_WARN_RANGE,
    TERMINAL_GROWTH_RANGE, TOL_DISCOUNT_FACTOR, TOL_EBITDA, TOL_ENTERPRISE_VALUE,
    TOL_EQUITY_VALUE, TOL_FCF_COMPOSITION, TOL_NOPAT, TOL_PRESENT_VALUE, TOL_REVENUE,
    TOL_TERMINAL_VALUE, WACC_RANGE,
};

/// WACC and terminal-growth bounds, and the growth-below-WACC ordering.
pub(super) fn check_rate_bounds(
    report: &mut ValidationReport,
    outcome: &ScenarioOutcome,
    assumptions: &ScenarioAssumptions,
) {
    let wacc = assumptions.discount_rate;
    if !(WACC_RANGE.0..=WACC_RANGE.1).contains(&wacc) {
        report.record(
            Finding::error(
                "WACC_RANGE",
                format!(
                    "WACC {:.4} outside plausible range [{}, {}]",
                    wacc, WACC_RANGE.0, WACC_RANGE.1
                ),
            )
            .with_observed(wacc),
        );
    }

    let terminal_growth = assumptions.terminal_growth;
    if !(TERMINAL_GROWTH_RANGE.0..=TERMINAL_GROWTH_RANGE.1).contains(&terminal_growth) {
        report.record(
            Finding::error(
                "TERMINAL_GROWTH_RANGE",
                format!(
                    "terminal growth {:.4} outside plausible range [{}, {}]",
                    terminal_growth, TERMINAL_GROWTH_RANGE.0, TERMINAL_GROWTH_RANGE.1
                ),
            )
            .with_observed(terminal_growth),
        );
    }

    if terminal_growth >= wacc {
        report.record(
            Finding::error(
                "GROWTH_VS_WACC",
                format!(
                    "stated terminal growth {:.4} is not strictly below WACC {:.4}",
                    terminal_growth, wacc
                ),
            )
            .with_values(terminal_growth, wacc),
        );
    }

    let terminal = &outcome.terminal_value;
    if terminal.growth_rate >= terminal.discount_rate {
        report.record(
            Finding::error(
                "GROWTH_VS_WACC_USED",
                "terminal growth actually used is not strictly below the WACC",
            )
            .with_values(terminal.growth_rate, terminal.discount_rate),
        );
    }
    if terminal.growth_was_clamped {
        report.record(
            Finding::info(
                "TERMINAL_GROWTH_CLAMPED",
                "terminal growth was clamped below the WACC during computation",
            )
            .with_observed(terminal.growth_rate),
        );
    }
}

/// Per-year growth and margin plausibility ranges. Warnings only.
pub(super) fn check_year_ranges(report: &mut ValidationReport, outcome: &ScenarioOutcome) {
    for row in &outcome.projections {
        if !(GROWTH_WARN_RANGE.0..=GROWTH_WARN_RANGE.1).contains(&row.revenue_growth) {
            report.record(
                Finding::warning(
                    "GROWTH_RANGE",
                    format!(
                        "revenue growth {:.4} in year {} outside plausible range",
                        row.revenue_growth, row.year
                    ),
                )
                .with_observed(row.revenue_growth),
            );
        }
        if !(MARGIN_WARN_RANGE.0..=MARGIN_WARN_RANGE.1).contains(&row.ebitda_margin) {
            report.record(
                Finding::warning(
                    "MARGIN_RANGE",
                    format!(
                        "EBITDA margin {:.4} in year {} outside plausible range",
                        row.ebitda_margin, row.year
                    ),
                )
                .with_observed(row.ebitda_margin),
            );
        }
    }
}

/// Revenue and EBITDA recomputed from the stated assumptions.
pub(super) fn check_revenue_and_ebitda(
    report: &mut ValidationReport,
    outcome: &ScenarioOutcome,
    assumptions: &ScenarioAssumptions,
    baseline: &BaselineFinancials,
) {
    let horizon = outcome.projections.len();

    let margins = match assumptions.margins.resolve(horizon) {
        Some(margins) => margins,
        None => {
            report.record(Finding::warning(
                "MARGINS_UNRESOLVED",
                "margin path could not be resolved from the stated assumptions",
            ));
            return;
        }
    };

    let mut expected_revenue = baseline.revenue;
    for (index, row) in outcome.projections.iter().enumerate() {
        match assumptions.growth.rate_for_year(index, horizon) {
            Some(rate) => {
                expected_revenue *= 1.0 + clamp_growth_rate(rate);
                if relative_diff(row.revenue, expected_revenue) > TOL_REVENUE {
                    report.record(
                        Finding::error(
                            "REVENUE_RECOMPUTE",
                            format!(
                                "revenue in year {} disagrees with the stated growth path",
                                row.year
                            ),
                        )
                        .with_values(row.revenue, expected_revenue),
                    );
                }
            }
            None => {
                report.record(Finding::warning(
                    "GROWTH_UNRESOLVED",
                    "growth path could not be resolved from the stated assumptions",
                ));
                return;
            }
        }

        let expected_ebitda = row.revenue * clamp_margin(margins[index]);
        if relative_diff(row.ebitda, expected_ebitda) > TOL_EBITDA {
            report.record(
                Finding::error(
                    "EBITDA_RECOMPUTE",
                    format!(
                        "EBITDA in year {} disagrees with the stated margin path",
                        row.year
                    ),
                )
                .with_values(row.ebitda, expected_ebitda),
            );
        }
    }
}

/// Terminal value and its present value recomputed from stated fields.
pub(super) fn check_terminal_value(report: &mut ValidationReport, outcome: &ScenarioOutcome) {
    let terminal = &outcome.terminal_value;
    let denominator = terminal.discount_rate - terminal.growth_rate;
    if denominator <= 0.0 {
        // already reported as GROWTH_VS_WACC_USED; recomputation is meaningless
        return;
    }

    let expected = terminal.terminal_fcf * (1.0 + terminal.growth_rate) / denominator;
    if relative_diff(terminal.value, expected) > TOL_TERMINAL_VALUE {
        report.record(
            Finding::error(
                "TERMINAL_VALUE",
                "terminal value disagrees with its stated FCF, growth and WACC",
            )
            .with_values(terminal.value, expected),
        );
    }

    let horizon = outcome.projections.len();
    let expected_pv = terminal.value * discount_factor(terminal.discount_rate, horizon);
    if relative_diff(terminal.present_value, expected_pv) > TOL_PRESENT_VALUE {
        report.record(
            Finding::error(
                "TERMINAL_VALUE_PV",
                "terminal present value disagrees with horizon discounting",
            )
            .with_values(terminal.present_value, expected_pv),
        );
    }
}

/// Discount factors recomputed as `(1 + WACC)^-year`.
pub(super) fn check_discount_factors(
    report: &mut ValidationReport,
    outcome: &ScenarioOutcome,
    assumptions: &ScenarioAssumptions,
) {
    for (index, row) in outcome.projections.iter().enumerate() {
        let expected = discount_factor(assumptions.discount_rate, index + 1);
        if relative_diff(row.discount_factor, expected) > TOL_DISCOUNT_FACTOR {
            report.record(
                Finding::error(
                    "DISCOUNT_FACTOR",
                    format!("discount factor in year {} disagrees with the WACC", row.year),
                )
                .with_values(row.discount_factor, expected),
            );
        }
    }
}

/// Enterprise and equity value recomputed from the bridge components.
pub(super) fn check_bridge(report: &mut ValidationReport, outcome: &ScenarioOutcome) {
    let bridge = &outcome.bridge;

    let pv_sum: f64 = outcome.projections.iter().map(|row| row.present_value).sum();
    let expected_ev = pv_sum + outcome.terminal_value.present_value;
    if relative_diff(bridge.enterprise_value, expected_ev) > TOL_ENTERPRISE_VALUE {
        report.record(
            Finding::error(
                "ENTERPRISE_VALUE",
                "enterprise value disagrees with the sum of discounted cash flows",
            )
            .with_values(bridge.enterprise_value, expected_ev),
        );
    }

    let expected_equity =
        bridge.enterprise_value * (1.0 - bridge.marketability_discount) - bridge.net_debt;
    if relative_diff(bridge.equity_value, expected_equity) > TOL_EQUITY_VALUE {
        report.record(
            Finding::error(
                "EQUITY_VALUE",
                "equity value disagrees with the marketability-discounted bridge",
            )
            .with_values(bridge.equity_value, expected_equity),
        );
    }
}

/// Per-year NOPAT, FCF composition and present-value identities.
pub(super) fn check_year_identities(
    report: &mut ValidationReport,
    outcome: &ScenarioOutcome,
    assumptions: &ScenarioAssumptions,
) {
    for row in &outcome.projections {
        let expected_nopat = row.ebit - row.ebit.max(0.0) * assumptions.tax_rate;
        if relative_diff(row.nopat, expected_nopat) > TOL_NOPAT {
            report.record(
                Finding::error(
                    "NOPAT",
                    format!("NOPAT in year {} disagrees with EBIT and the tax rate", row.year),
                )
                .with_values(row.nopat, expected_nopat),
            );
        }

        // FCF composition can legitimately vary; warning only
        let depreciation = row.ebitda - row.ebit;
        let expected_fcf =
            row.nopat + depreciation - row.capex - row.working_capital_change;
        if relative_diff(row.free_cash_flow, expected_fcf) > TOL_FCF_COMPOSITION {
            report.record(
                Finding::warning(
                    "FCF_COMPOSITION",
                    format!(
                        "free cash flow in year {} does not reconcile from NOPAT",
                        row.year
                    ),
                )
                .with_values(row.free_cash_flow, expected_fcf),
            );
        }

        let expected_pv = row.free_cash_flow * row.discount_factor;
        if relative_diff(row.present_value, expected_pv) > TOL_PRESENT_VALUE {
            report.record(
                Finding::error(
                    "PRESENT_VALUE",
                    format!("present value in year {} disagrees with FCF x discount factor", row.year),
                )
                .with_values(row.present_value, expected_pv),
            );
        }
    }
}

/// Market-reasonableness observations. Warnings and info only.
pub(super) fn check_market_reasonableness(
    report: &mut ValidationReport,
    outcome: &ScenarioOutcome,
    baseline: &BaselineFinancials,
) {
    let bridge = &outcome.bridge;

    if baseline.revenue > 0.0 {
        let ev_revenue = bridge.enterprise_value / baseline.revenue;
        if !(EV_REVENUE_RANGE.0..=EV_REVENUE_RANGE.1).contains(&ev_revenue) {
            report.record(
                Finding::warning(
                    "EV_REVENUE_MULTIPLE",
                    format!("implied EV/Revenue multiple {:.2} outside market range", ev_revenue),
                )
                .with_observed(ev_revenue),
            );
        } else {
            report.record(
                Finding::info("EV_REVENUE_MULTIPLE", "implied EV/Revenue multiple")
                    .with_observed(ev_revenue),
            );
        }
    }

    if !outcome.projections.is_empty() {
        let average_fcf_margin: f64 = outcome
            .projections
            .iter()
            .map(|row| row.free_cash_flow / row.revenue)
            .sum::<f64>()
            / outcome.projections.len() as f64;
        if !(FCF_MARGIN_RANGE.0..=FCF_MARGIN_RANGE.1).contains(&average_fcf_margin) {
            report.record(
                Finding::warning(
                    "FCF_MARGIN",
                    format!("average FCF margin {:.4} outside plausible range", average_fcf_margin),
                )
                .with_observed(average_fcf_margin),
            );
        }
    }

    if bridge.enterprise_value > 0.0 {
        report.record(
            Finding::info(
                "TERMINAL_SHARE",
                "share of enterprise value contributed by the terminal value",
            )
            .with_observed(bridge.terminal_value_pv / bridge.enterprise_value),
        );
    }
}
