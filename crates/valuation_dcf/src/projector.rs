//! Year-by-year scenario projection.
//!
//! Pure function over its inputs: one scenario's assumptions plus the
//! shared baseline produce an ordered sequence of [`AnnualProjection`]
//! rows. Any non-finite or non-positive required intermediate aborts this
//! scenario only.

use valuation_core::math::{clamp_growth_rate, clamp_margin, discount_factor};
use valuation_core::types::{
    AnnualProjection, BaselineFinancials, ScenarioAssumptions, ScenarioError, ScenarioKind,
};

/// Project one scenario over the given horizon.
///
/// Revenue compounds from the baseline at the clamped growth rate; margins
/// follow the resolved margin path; working-capital flows enter free cash
/// flow as the first difference of the working-capital balance, never the
/// balance itself.
///
/// # Errors
///
/// Returns a [`ScenarioError`] naming this scenario and the offending
/// field when an assumption is missing, a rate is non-finite, or a
/// projected revenue is zero, negative or non-finite.
pub fn project_scenario(
    kind: ScenarioKind,
    assumptions: &ScenarioAssumptions,
    baseline: &BaselineFinancials,
    horizon: usize,
) -> Result<Vec<AnnualProjection>, ScenarioError> {
    validate_inputs(kind, assumptions, baseline)?;

    let margins = assumptions
        .margins
        .resolve(horizon)
        .ok_or_else(|| ScenarioError::MissingAssumption {
            scenario: kind,
            field: "margins".to_string(),
        })?;

    let wacc = assumptions.discount_rate;
    let mut projections = Vec::with_capacity(horizon);
    let mut revenue = baseline.revenue;
    let mut wc_balance = baseline.working_capital;

    for year_index in 1..=horizon {
        let raw_growth = assumptions
            .growth
            .rate_for_year(year_index - 1, horizon)
            .ok_or_else(|| ScenarioError::MissingAssumption {
                scenario: kind,
                field: "growth".to_string(),
            })?;
        if !raw_growth.is_finite() {
            return Err(ScenarioError::InvalidRate {
                scenario: kind,
                field: "growth".to_string(),
                value: raw_growth,
            });
        }
        let growth = clamp_growth_rate(raw_growth);

        revenue *= 1.0 + growth;
        if !revenue.is_finite() {
            return Err(ScenarioError::NonFiniteValue {
                scenario: kind,
                field: "revenue".to_string(),
                year: year_index,
            });
        }
        if revenue <= 0.0 {
            return Err(ScenarioError::NonPositiveRevenue {
                scenario: kind,
                year: year_index,
                revenue,
            });
        }

        let margin = clamp_margin(margins[year_index - 1]);
        if !margin.is_finite() {
            return Err(ScenarioError::NonFiniteValue {
                scenario: kind,
                field: "ebitda_margin".to_string(),
                year: year_index,
            });
        }

        let ebitda = revenue * margin;
        let depreciation = revenue * assumptions.depreciation_rate;
        let ebit = ebitda - depreciation;
        // no tax benefit credited for losses
        let tax = ebit.max(0.0) * assumptions.tax_rate;
        let nopat = ebit - tax;
        let capex = revenue * assumptions.capex_rate;

        // first difference of the working-capital balance, not the balance
        let new_wc_balance = revenue * assumptions.working_capital_rate;
        let working_capital_change = new_wc_balance - wc_balance;
        wc_balance = new_wc_balance;

        let free_cash_flow = nopat + depreciation - capex - working_capital_change;
        let df = discount_factor(wacc, year_index);
        let present_value = free_cash_flow * df;

        if !free_cash_flow.is_finite() || !present_value.is_finite() {
            return Err(ScenarioError::NonFiniteValue {
                scenario: kind,
                field: "free_cash_flow".to_string(),
                year: year_index,
            });
        }

        projections.push(AnnualProjection {
            year: baseline.base_year + year_index as i32,
            revenue,
            revenue_growth: growth,
            ebitda,
            ebitda_margin: margin,
            ebit,
            tax,
            nopat,
            capex,
            working_capital_change,
            free_cash_flow,
            discount_factor: df,
            present_value,
        });
    }

    Ok(projections)
}

fn validate_inputs(
    kind: ScenarioKind,
    assumptions: &ScenarioAssumptions,
    baseline: &BaselineFinancials,
) -> Result<(), ScenarioError> {
    if !baseline.revenue.is_finite() || baseline.revenue <= 0.0 {
        return Err(ScenarioError::NonPositiveRevenue {
            scenario: kind,
            year: 0,
            revenue: baseline.revenue,
        });
    }
    if !baseline.working_capital.is_finite() {
        return Err(ScenarioError::NonFiniteValue {
            scenario: kind,
            field: "working_capital".to_string(),
            year: 0,
        });
    }

    let rates = [
        ("capex_rate", assumptions.capex_rate),
        ("working_capital_rate", assumptions.working_capital_rate),
        ("depreciation_rate", assumptions.depreciation_rate),
        ("terminal_growth", assumptions.terminal_growth),
        ("tax_rate", assumptions.tax_rate),
    ];
    for (field, value) in rates {
        if !value.is_finite() {
            return Err(ScenarioError::InvalidRate {
                scenario: kind,
                field: field.to_string(),
                value,
            });
        }
    }

    // a WACC at or below -100% has no discount factor
    let wacc = assumptions.discount_rate;
    if !wacc.is_finite() || wacc <= -1.0 {
        return Err(ScenarioError::InvalidRate {
            scenario: kind,
            field: "discount_rate".to_string(),
            value: wacc,
        });
    }

    Ok(())
}
