//! # valuation_core: Domain Types for the Valuation Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! valuation_core is the bottom layer of the 3-layer workspace, providing:
//! - Scenario inputs: `ScenarioAssumptions`, `GrowthModel`, `MarginPath`
//!   (`types::scenario`)
//! - Projection outputs: `AnnualProjection`, `TerminalValue`,
//!   `ValuationBridge`, `DcfResult` (`types::projection`)
//! - Readiness inputs: `SalesReadinessAnalysis` (`types::readiness`)
//! - Adjustment/rescaling records: `AdjustmentFactors`,
//!   `OriginalValuationSnapshot` (`types::adjustment`)
//! - Error types: `ScenarioError`, `RescaleError` (`types::error`)
//! - Rate mathematics: clamps, glide curves, discount factors (`math`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other valuation_* crates, with minimal
//! external dependencies:
//! - thiserror: Structured error types
//! - chrono: The explicit "current year" baseline constructor
//! - serde: Serialisation support (optional, default-on)
//!
//! The engine layers above (`valuation_dcf`, `valuation_adjust`) operate
//! purely on the types defined here; persistence of results is the caller's
//! concern.
//!
//! ## Usage Examples
//!
//! ```rust
//! use valuation_core::math::{clamp_growth_rate, discount_factor};
//! use valuation_core::types::{CompanyProfile, ScenarioKind};
//!
//! // Growth rates are always clamped before use
//! assert_eq!(clamp_growth_rate(1.7), 1.0);
//!
//! // Discount factor for projection year 2 at 10% WACC
//! let df = discount_factor(0.10, 2);
//! assert!((df - 1.0 / 1.21).abs() < 1e-12);
//!
//! // The company profile drives horizon and marketability discount
//! assert_eq!(CompanyProfile::Established.horizon(), 5);
//! assert_eq!(ScenarioKind::Base.name(), "base");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;

pub use types::{
    AdjustedValuation, AdjustmentFactors, AnnualProjection, BaselineFinancials, CategoryAssessment,
    CompanyProfile, DcfResult, GlideShape, GrowthModel, MarginPath, OriginalValuationSnapshot,
    PeriodFinancials, ReadinessCategory, RescaleError, SalesReadinessAnalysis,
    ScenarioAssumptions, ScenarioComputation, ScenarioError, ScenarioKind, ScenarioOutcome,
    ScenarioSet, TerminalValue, ValuationBridge, ValuationMethod,
};
