//! Projection outputs of one DCF run.
//!
//! All rows are computed once per scenario per run and are immutable
//! afterwards; the engine returns them for the caller to persist.

use super::error::ScenarioError;
use super::scenario::ScenarioKind;

/// One projected financial year.
///
/// `working_capital_change` is a first difference of the working-capital
/// balance, not the balance itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnualProjection {
    /// Calendar year of this row
    pub year: i32,
    /// Projected revenue
    pub revenue: f64,
    /// Revenue growth over the prior year (after clamping)
    pub revenue_growth: f64,
    /// Projected EBITDA
    pub ebitda: f64,
    /// EBITDA margin used for this year (after clamping)
    pub ebitda_margin: f64,
    /// EBIT = EBITDA - depreciation
    pub ebit: f64,
    /// Tax on positive EBIT; zero when EBIT is a loss
    pub tax: f64,
    /// NOPAT = EBIT - tax
    pub nopat: f64,
    /// Capex at the assumed fraction of revenue
    pub capex: f64,
    /// Change in the working-capital balance against the prior year
    pub working_capital_change: f64,
    /// Free cash flow = NOPAT + depreciation - capex - WC change
    pub free_cash_flow: f64,
    /// Discount factor (1 + WACC)^-year_index
    pub discount_factor: f64,
    /// Present value of the free cash flow
    pub present_value: f64,
}

/// Terminal value of one scenario via perpetuity growth.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminalValue {
    /// Terminal free cash flow, normalised when the raw final-year FCF was
    /// negative
    pub terminal_fcf: f64,
    /// Growth rate actually used, possibly clamped below the WACC
    pub growth_rate: f64,
    /// Discount rate (WACC)
    pub discount_rate: f64,
    /// Terminal value before discounting
    pub value: f64,
    /// Present value of the terminal value
    pub present_value: f64,
    /// Whether the growth rate was clamped to preserve `g < WACC`
    pub growth_was_clamped: bool,
    /// Whether the terminal FCF was normalised from a negative raw value
    pub fcf_was_normalised: bool,
}

/// Bridge from discounted cash flows to equity value for one scenario.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuationBridge {
    /// Sum of the discounted interim free cash flows
    pub pv_of_cash_flows: f64,
    /// Discounted terminal value
    pub terminal_value_pv: f64,
    /// Enterprise value: interim PVs plus terminal PV
    pub enterprise_value: f64,
    /// Discount for lack of marketability applied multiplicatively
    pub marketability_discount: f64,
    /// Net debt subtracted from the marketable enterprise value
    pub net_debt: f64,
    /// Resulting equity value
    pub equity_value: f64,
}

/// Full output of one scenario's DCF computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioOutcome {
    /// Scenario this outcome belongs to
    pub scenario: ScenarioKind,
    /// Year-by-year projection rows, chronological
    pub projections: Vec<AnnualProjection>,
    /// Terminal value calculation
    pub terminal_value: TerminalValue,
    /// Enterprise-to-equity bridge
    pub bridge: ValuationBridge,
}

/// Result of one scenario's computation: the outcome, or the typed error
/// that aborted this scenario alone.
pub type ScenarioComputation = Result<ScenarioOutcome, ScenarioError>;

/// The three per-scenario results of one DCF run.
///
/// A failed scenario never blocks the other two; callers decide whether
/// partial results are usable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DcfResult {
    /// Downside scenario result
    pub pessimistic: ScenarioComputation,
    /// Central scenario result
    pub base: ScenarioComputation,
    /// Upside scenario result
    pub optimistic: ScenarioComputation,
}

impl DcfResult {
    /// Result for a scenario kind.
    pub fn get(&self, kind: ScenarioKind) -> &ScenarioComputation {
        match kind {
            ScenarioKind::Pessimistic => &self.pessimistic,
            ScenarioKind::Base => &self.base,
            ScenarioKind::Optimistic => &self.optimistic,
        }
    }

    /// Iterate the scenarios that completed, in reporting order.
    pub fn completed(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        ScenarioKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).as_ref().ok())
    }

    /// Iterate the scenarios that failed, in reporting order.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioError> {
        ScenarioKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).as_ref().err())
    }

    /// Whether all three scenarios completed.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Equity value of a completed scenario, if available.
    pub fn equity_value(&self, kind: ScenarioKind) -> Option<f64> {
        self.get(kind)
            .as_ref()
            .ok()
            .map(|outcome| outcome.bridge.equity_value)
    }
}
