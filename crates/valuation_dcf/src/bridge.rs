//! Enterprise-to-equity bridge.
//!
//! Aggregates discounted cash flows into enterprise value, applies the
//! marketability discount for the company profile, and subtracts net debt.

use valuation_core::types::{AnnualProjection, CompanyProfile, TerminalValue, ValuationBridge};

/// Assemble the valuation bridge for one scenario.
///
/// Enterprise value is the sum of the interim present values plus the
/// discounted terminal value. The discount for lack of marketability (20%
/// established, 30% early-stage) is applied multiplicatively before net
/// debt is subtracted:
///
/// ```text
/// equity = (Σ PV(FCF) + PV(TV)) × (1 - DLOM) - net debt
/// ```
pub fn build_bridge(
    projections: &[AnnualProjection],
    terminal_value: &TerminalValue,
    profile: CompanyProfile,
    net_debt: f64,
) -> ValuationBridge {
    let pv_of_cash_flows: f64 = projections.iter().map(|row| row.present_value).sum();
    let enterprise_value = pv_of_cash_flows + terminal_value.present_value;
    let marketability_discount = profile.marketability_discount();
    let equity_value = enterprise_value * (1.0 - marketability_discount) - net_debt;

    ValuationBridge {
        pv_of_cash_flows,
        terminal_value_pv: terminal_value.present_value,
        enterprise_value,
        marketability_discount,
        net_debt,
        equity_value,
    }
}
