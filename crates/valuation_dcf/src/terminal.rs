//! Perpetuity-growth terminal value.
//!
//! Two policy interventions live here, both explicit and both logged:
//! normalisation of a negative final-year free cash flow, and clamping of
//! the terminal growth rate below the WACC.

use valuation_core::math::discount_factor;
use valuation_core::types::{AnnualProjection, ScenarioAssumptions, TerminalValue};

/// Gap enforced between the terminal growth rate and the WACC when the
/// stated growth rate reaches the WACC.
///
/// Single clamp policy for the whole engine; the assumptions themselves
/// are never rewritten, so the validator still sees the stated rate.
pub const TERMINAL_GROWTH_GAP: f64 = 0.01;

/// Fraction of the assumed capex rate treated as sustainable in
/// perpetuity when normalising a negative terminal FCF.
const SUSTAINABLE_CAPEX_FRACTION: f64 = 0.60;

/// Floor for the sustainable capex rate, as a fraction of revenue.
const MIN_SUSTAINABLE_CAPEX_RATE: f64 = 0.02;

/// Minimal perpetual working-capital growth charge, as a fraction of
/// revenue, used in terminal FCF normalisation.
const TERMINAL_WC_GROWTH_RATE: f64 = 0.01;

/// Compute the terminal value from the final projected year.
///
/// A negative raw final-year FCF is not capitalised as-is: it is rebuilt
/// from NOPAT under a sustainable capex rate and a minimal working-capital
/// growth assumption (see [`normalised_terminal_fcf`]). A terminal growth
/// rate at or above the WACC is clamped to `WACC - 1%`; the clamp is
/// recorded on the result and logged. The denominator `WACC - g` is
/// therefore strictly positive by construction.
pub fn compute_terminal_value(
    final_year: &AnnualProjection,
    assumptions: &ScenarioAssumptions,
    horizon: usize,
) -> TerminalValue {
    let wacc = assumptions.discount_rate;

    let raw_fcf = final_year.free_cash_flow;
    let fcf_was_normalised = raw_fcf < 0.0;
    let terminal_fcf = if fcf_was_normalised {
        let normalised = normalised_terminal_fcf(final_year, assumptions);
        tracing::warn!(
            raw_fcf,
            normalised,
            "negative terminal FCF normalised from sustainable NOPAT"
        );
        normalised
    } else {
        raw_fcf
    };

    let stated_growth = assumptions.terminal_growth;
    let growth_was_clamped = stated_growth >= wacc;
    let growth_rate = if growth_was_clamped {
        let clamped = wacc - TERMINAL_GROWTH_GAP;
        tracing::warn!(
            stated_growth,
            wacc,
            clamped,
            "terminal growth at or above WACC clamped"
        );
        clamped
    } else {
        stated_growth
    };

    let value = terminal_fcf * (1.0 + growth_rate) / (wacc - growth_rate);
    let present_value = value * discount_factor(wacc, horizon);

    TerminalValue {
        terminal_fcf,
        growth_rate,
        discount_rate: wacc,
        value,
        present_value,
        growth_was_clamped,
        fcf_was_normalised,
    }
}

/// The named normalisation step for negative terminal free cash flow.
///
/// Rebuilds a sustainable FCF from the final year's NOPAT and
/// depreciation, charging a reduced capex rate
/// (`max(0.6 × assumed, 2%)` of revenue) and a minimal working-capital
/// growth charge (1% of revenue) instead of the year's actual outflows.
/// Floored at zero: a business that cannot sustain any positive cash flow
/// in perpetuity contributes no terminal value rather than a negative one.
pub fn normalised_terminal_fcf(
    final_year: &AnnualProjection,
    assumptions: &ScenarioAssumptions,
) -> f64 {
    let revenue = final_year.revenue;
    let depreciation = final_year.ebitda - final_year.ebit;
    let sustainable_capex_rate =
        (assumptions.capex_rate * SUSTAINABLE_CAPEX_FRACTION).max(MIN_SUSTAINABLE_CAPEX_RATE);
    let sustainable_capex = revenue * sustainable_capex_rate;
    let wc_growth_charge = revenue * TERMINAL_WC_GROWTH_RATE;

    (final_year.nopat + depreciation - sustainable_capex - wc_growth_charge).max(0.0)
}
