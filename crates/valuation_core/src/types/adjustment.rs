//! Adjustment factors and valuation snapshot records.
//!
//! [`OriginalValuationSnapshot`] is created once when a valuation
//! completes and never mutated afterwards; the rescaling engine only reads
//! it and produces a fresh [`AdjustedValuation`] on every run.

use std::collections::BTreeMap;
use std::fmt;

use super::readiness::ReadinessCategory;

/// The equity-value methods of the original valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValuationMethod {
    /// Equity value derived from a revenue multiple
    RevenueMultiple,
    /// Equity value derived from an EBIT multiple
    EbitMultiple,
    /// Equity value derived from an EBITDA multiple
    EbitdaMultiple,
    /// Equity value derived from a price/earnings multiple
    PriceEarnings,
    /// Book value of equity; insensitive to multiples
    BookValue,
    /// Asset-based value; insensitive to multiples
    AssetBased,
}

impl ValuationMethod {
    /// All methods, in reporting order.
    pub const ALL: [ValuationMethod; 6] = [
        ValuationMethod::RevenueMultiple,
        ValuationMethod::EbitMultiple,
        ValuationMethod::EbitdaMultiple,
        ValuationMethod::PriceEarnings,
        ValuationMethod::BookValue,
        ValuationMethod::AssetBased,
    ];

    /// Whether this method is driven by a market multiple.
    ///
    /// Methods that are not pass through the rescaling unchanged.
    pub fn is_multiple_based(&self) -> bool {
        !matches!(
            self,
            ValuationMethod::BookValue | ValuationMethod::AssetBased
        )
    }

    /// Snake-case name of this method.
    pub fn name(&self) -> &'static str {
        match self {
            ValuationMethod::RevenueMultiple => "revenue_multiple",
            ValuationMethod::EbitMultiple => "ebit_multiple",
            ValuationMethod::EbitdaMultiple => "ebitda_multiple",
            ValuationMethod::PriceEarnings => "price_earnings",
            ValuationMethod::BookValue => "book_value",
            ValuationMethod::AssetBased => "asset_based",
        }
    }
}

impl fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multiplicative adjustment factors derived from a readiness analysis.
///
/// 1.0 everywhere means "no change". Factors are bounded to [0.5, 2.0] by
/// the factor engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdjustmentFactors {
    /// One factor per assessed category
    pub category_factors: BTreeMap<ReadinessCategory, f64>,
    /// Composite factor applied to revenue multiples
    pub revenue_multiple_factor: f64,
    /// Composite factor applied to EBIT multiples
    pub ebit_multiple_factor: f64,
    /// Composite factor applied to EBITDA multiples
    pub ebitda_multiple_factor: f64,
    /// Composite factor applied to price/earnings multiples
    pub pe_multiple_factor: f64,
    /// Overall blended factor over the categories actually present
    pub overall_factor: f64,
}

impl AdjustmentFactors {
    /// Neutral factors: 1.0 everywhere.
    pub fn neutral() -> Self {
        Self {
            category_factors: BTreeMap::new(),
            revenue_multiple_factor: 1.0,
            ebit_multiple_factor: 1.0,
            ebitda_multiple_factor: 1.0,
            pe_multiple_factor: 1.0,
            overall_factor: 1.0,
        }
    }

    /// Method-specific factor for a valuation method.
    ///
    /// `None` for methods that are not multiple-based; callers fall back
    /// to [`AdjustmentFactors::overall_factor`] when a method-specific
    /// factor is unavailable.
    pub fn method_factor(&self, method: ValuationMethod) -> Option<f64> {
        match method {
            ValuationMethod::RevenueMultiple => Some(self.revenue_multiple_factor),
            ValuationMethod::EbitMultiple => Some(self.ebit_multiple_factor),
            ValuationMethod::EbitdaMultiple => Some(self.ebitda_multiple_factor),
            ValuationMethod::PriceEarnings => Some(self.pe_multiple_factor),
            ValuationMethod::BookValue | ValuationMethod::AssetBased => None,
        }
    }

    /// Whether every factor equals 1.0 exactly.
    pub fn is_neutral(&self) -> bool {
        self.revenue_multiple_factor == 1.0
            && self.ebit_multiple_factor == 1.0
            && self.ebitda_multiple_factor == 1.0
            && self.pe_multiple_factor == 1.0
            && self.overall_factor == 1.0
            && self.category_factors.values().all(|f| *f == 1.0)
    }
}

impl Default for AdjustmentFactors {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Immutable record of a previously completed valuation.
///
/// Created once when the valuation completes; the rescaling engine reads
/// it and never writes back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OriginalValuationSnapshot {
    /// Multiple used per multiple-based method
    pub multiples: BTreeMap<ValuationMethod, f64>,
    /// Equity value produced by each method
    pub method_values: BTreeMap<ValuationMethod, f64>,
    /// The subset of methods included in the averaged valuation, frozen at
    /// valuation time
    pub included_methods: Vec<ValuationMethod>,
    /// Averaged equity value over the included methods
    pub average_value: f64,
    /// Low end of the reported valuation range
    pub range_low: f64,
    /// High end of the reported valuation range
    pub range_high: f64,
}

impl OriginalValuationSnapshot {
    /// Equity value recorded for a method, if any.
    pub fn method_value(&self, method: ValuationMethod) -> Option<f64> {
        self.method_values.get(&method).copied()
    }

    /// Multiple recorded for a method, if any.
    pub fn multiple(&self, method: ValuationMethod) -> Option<f64> {
        self.multiples.get(&method).copied()
    }
}

/// Current-period financial metrics handed to the rescaling engine.
///
/// Only the book value participates in the rescaling itself (as the
/// fallback when no method survives with a positive value); the remaining
/// metrics travel with the result for the caller to persist.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodFinancials {
    /// Revenue of the assessed period
    pub revenue: f64,
    /// EBIT of the assessed period
    pub ebit: f64,
    /// EBITDA of the assessed period
    pub ebitda: f64,
    /// Net income of the assessed period
    pub net_income: f64,
    /// Book value of equity at the end of the period
    pub book_value: f64,
}

/// Output of one rescaling run.
///
/// Produced fresh on every run and persisted as a new record; the original
/// snapshot is never overwritten.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdjustedValuation {
    /// New averaged equity value
    pub equity_value: f64,
    /// New low end of the valuation range
    pub range_low: f64,
    /// New high end of the valuation range
    pub range_high: f64,
    /// Adjusted multiple per multiple-based method that was rescaled
    pub adjusted_multiples: BTreeMap<ValuationMethod, f64>,
    /// Rescaled equity value per included method
    pub method_values: BTreeMap<ValuationMethod, f64>,
    /// Whether the book-value fallback replaced the method average
    pub used_book_value_fallback: bool,
}
