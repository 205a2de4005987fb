//! Scenario inputs for the DCF calculation.
//!
//! A DCF run takes one [`ScenarioAssumptions`] per scenario kind plus a
//! shared [`BaselineFinancials`]. The three DCF variants of the product
//! (full-history, benchmark-weighted, early-stage) differ only in how the
//! growth-rate input is derived; that difference is modelled by the
//! [`GrowthModel`] sum type rather than by separate calculators.

use std::fmt;

use crate::math::{lerp, smoothstep, BREAKEVEN_WINDOW_YEARS};

/// Identifier of one of the three scenarios in a DCF run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScenarioKind {
    /// Downside scenario
    Pessimistic,
    /// Central scenario
    Base,
    /// Upside scenario
    Optimistic,
}

impl ScenarioKind {
    /// All three scenario kinds, in reporting order.
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Pessimistic,
        ScenarioKind::Base,
        ScenarioKind::Optimistic,
    ];

    /// Lower-case name of this scenario.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::Pessimistic => "pessimistic",
            ScenarioKind::Base => "base",
            ScenarioKind::Optimistic => "optimistic",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Company maturity profile.
///
/// Drives the projection horizon and the discount for lack of
/// marketability applied to the enterprise value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompanyProfile {
    /// Established company: 5-year horizon, 20% marketability discount.
    #[default]
    Established,
    /// Early-stage / high-uncertainty company: 7-year horizon, 30%
    /// marketability discount.
    EarlyStage,
}

impl CompanyProfile {
    /// Projection horizon in years.
    pub fn horizon(&self) -> usize {
        match self {
            CompanyProfile::Established => 5,
            CompanyProfile::EarlyStage => 7,
        }
    }

    /// Discount for lack of marketability applied to the pre-discount NPV.
    pub fn marketability_discount(&self) -> f64 {
        match self {
            CompanyProfile::Established => 0.20,
            CompanyProfile::EarlyStage => 0.30,
        }
    }
}

/// How the annual revenue growth rate is derived.
///
/// One variant per DCF flavour of the product, plus an explicit escape
/// hatch for externally supplied rates. Every resolved rate is clamped to
/// [-50%, +100%] at the point of use.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GrowthModel {
    /// Uniform rate derived from the company's historical CAGR.
    HistoricalCagr {
        /// Compound annual growth rate observed over the historical window
        cagr: f64,
    },

    /// Industry-benchmark rate decaying geometrically year over year.
    IndustryBenchmark {
        /// First-year benchmark growth rate
        benchmark: f64,
        /// Per-year decay factor in (0, 1]; 1.0 keeps the rate flat
        decay: f64,
    },

    /// Early-stage declining-rate curve: linear from `initial` down to
    /// `floor` across the horizon.
    DecliningCurve {
        /// Growth rate in the first projected year
        initial: f64,
        /// Long-run growth rate reached in the final projected year
        floor: f64,
    },

    /// Externally supplied per-year rates. Years beyond the list reuse the
    /// final rate; an empty list is a missing assumption.
    Explicit(Vec<f64>),
}

impl GrowthModel {
    /// Resolve the (unclamped) growth rate for a 0-based projection year.
    ///
    /// Returns `None` only for an empty [`GrowthModel::Explicit`] list;
    /// callers surface that as a missing-assumption error.
    pub fn rate_for_year(&self, year_index: usize, horizon: usize) -> Option<f64> {
        match self {
            GrowthModel::HistoricalCagr { cagr } => Some(*cagr),
            GrowthModel::IndustryBenchmark { benchmark, decay } => {
                Some(benchmark * decay.powi(year_index as i32))
            }
            GrowthModel::DecliningCurve { initial, floor } => {
                if horizon <= 1 {
                    Some(*initial)
                } else {
                    let t = year_index as f64 / (horizon - 1) as f64;
                    Some(lerp(*initial, *floor, t))
                }
            }
            GrowthModel::Explicit(rates) => {
                let last = rates.last()?;
                Some(rates.get(year_index).copied().unwrap_or(*last))
            }
        }
    }
}

/// Shape of the margin glide from the starting margin to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlideShape {
    /// Straight-line interpolation.
    #[default]
    Linear,
    /// S-curve (smoothstep): slow at both ends, steep in the middle.
    SCurve,
}

impl GlideShape {
    /// Interpolation weight for progress `t` in [0, 1].
    pub fn weight(&self, t: f64) -> f64 {
        match self {
            GlideShape::Linear => t.clamp(0.0, 1.0),
            GlideShape::SCurve => smoothstep(t),
        }
    }
}

/// How the per-year EBITDA margins are derived.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarginPath {
    /// Externally supplied per-year margins. Years beyond the list reuse
    /// the final margin; an empty list is a missing assumption.
    Explicit(Vec<f64>),

    /// Glide from the current margin toward a target margin across the
    /// horizon.
    ///
    /// A negative `start` is first walked linearly to breakeven over
    /// [`BREAKEVEN_WINDOW_YEARS`] before the glide toward `target`
    /// begins. Every resolved margin is clamped to [-20%, +50%] by the
    /// projector.
    Glide {
        /// Current EBITDA margin
        start: f64,
        /// Target EBITDA margin at the end of the horizon
        target: f64,
        /// Interpolation shape of the glide
        shape: GlideShape,
    },
}

impl MarginPath {
    /// Resolve the (unclamped) margin sequence for a projection horizon.
    ///
    /// Returns one margin per projection year, chronological. `None` only
    /// for an empty [`MarginPath::Explicit`] list.
    pub fn resolve(&self, horizon: usize) -> Option<Vec<f64>> {
        match self {
            MarginPath::Explicit(margins) => {
                let last = *margins.last()?;
                Some(
                    (0..horizon)
                        .map(|i| margins.get(i).copied().unwrap_or(last))
                        .collect(),
                )
            }
            MarginPath::Glide {
                start,
                target,
                shape,
            } => Some(Self::glide_path(*start, *target, *shape, horizon)),
        }
    }

    /// The named breakeven-then-glide policy for margin paths.
    ///
    /// Negative starting margins are not glided directly toward the target:
    /// they are first reduced to zero over the fixed breakeven window, and
    /// only the remaining years glide toward the target. The reduction
    /// toward breakeven is monotone non-decreasing.
    fn glide_path(start: f64, target: f64, shape: GlideShape, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return Vec::new();
        }
        if start >= 0.0 {
            return (1..=horizon)
                .map(|i| {
                    let t = i as f64 / horizon as f64;
                    lerp(start, target, shape.weight(t))
                })
                .collect();
        }

        let window = BREAKEVEN_WINDOW_YEARS.min(horizon);
        let mut margins = Vec::with_capacity(horizon);
        for i in 1..=window {
            // linear walk from `start` up to breakeven at the end of the window
            margins.push(start * (1.0 - i as f64 / window as f64));
        }
        // glide resumes from breakeven; a target still below zero holds there
        let remaining = horizon - window;
        for i in 1..=remaining {
            let t = i as f64 / remaining as f64;
            margins.push(lerp(0.0, target.max(0.0), shape.weight(t)));
        }
        margins
    }
}

/// One scenario's full assumption set.
///
/// The terminal-growth-below-WACC invariant is enforced by clamping inside
/// the terminal value engine, never by rejecting the assumptions, so the
/// pipeline stays non-blocking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioAssumptions {
    /// Revenue growth derivation
    pub growth: GrowthModel,
    /// EBITDA margin derivation
    pub margins: MarginPath,
    /// Capex as a fraction of revenue
    pub capex_rate: f64,
    /// Working capital as a fraction of revenue
    pub working_capital_rate: f64,
    /// Depreciation as a fraction of revenue
    pub depreciation_rate: f64,
    /// Perpetuity growth rate beyond the horizon
    pub terminal_growth: f64,
    /// Discount rate (WACC)
    pub discount_rate: f64,
    /// Tax rate applied to positive EBIT
    pub tax_rate: f64,
}

/// The three per-scenario assumption sets of one DCF run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioSet {
    /// Downside assumptions
    pub pessimistic: ScenarioAssumptions,
    /// Central assumptions
    pub base: ScenarioAssumptions,
    /// Upside assumptions
    pub optimistic: ScenarioAssumptions,
}

impl ScenarioSet {
    /// Assumptions for a scenario kind.
    pub fn get(&self, kind: ScenarioKind) -> &ScenarioAssumptions {
        match kind {
            ScenarioKind::Pessimistic => &self.pessimistic,
            ScenarioKind::Base => &self.base,
            ScenarioKind::Optimistic => &self.optimistic,
        }
    }

    /// Build a set that uses the same assumptions for all three scenarios.
    ///
    /// Useful for tests and for callers that derive the outer scenarios by
    /// shifting the base case.
    pub fn uniform(assumptions: ScenarioAssumptions) -> Self {
        Self {
            pessimistic: assumptions.clone(),
            base: assumptions.clone(),
            optimistic: assumptions,
        }
    }
}

/// Starting financial position shared by all three scenarios.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaselineFinancials {
    /// Revenue of the most recent completed year
    pub revenue: f64,
    /// Working-capital balance at the end of the most recent year
    pub working_capital: f64,
    /// Net debt subtracted from enterprise value
    pub net_debt: f64,
    /// Calendar year the projection starts from (year 0)
    pub base_year: i32,
}

impl BaselineFinancials {
    /// Create a baseline with an explicit base year.
    pub fn new(revenue: f64, working_capital: f64, net_debt: f64, base_year: i32) -> Self {
        Self {
            revenue,
            working_capital,
            net_debt,
            base_year,
        }
    }

    /// Create a baseline anchored at the current calendar year.
    ///
    /// This is the only clock access in the engine; everything downstream
    /// treats `base_year` as plain input.
    pub fn current(revenue: f64, working_capital: f64, net_debt: f64) -> Self {
        use chrono::Datelike;
        Self::new(revenue, working_capital, net_debt, chrono::Utc::now().year())
    }
}
