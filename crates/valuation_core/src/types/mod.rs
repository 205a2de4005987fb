//! Domain types of the valuation engine.
//!
//! Grouped by pipeline stage:
//! - `scenario`: inputs to the DCF calculation
//! - `projection`: outputs of the DCF calculation
//! - `readiness`: inputs to the adjustment factor engine
//! - `adjustment`: factors, snapshots and rescaling outputs
//! - `error`: fatal error types

mod adjustment;
mod error;
mod projection;
mod readiness;
mod scenario;

pub use adjustment::{
    AdjustedValuation, AdjustmentFactors, OriginalValuationSnapshot, PeriodFinancials,
    ValuationMethod,
};
pub use error::{RescaleError, ScenarioError};
pub use projection::{
    AnnualProjection, DcfResult, ScenarioComputation, ScenarioOutcome, TerminalValue,
    ValuationBridge,
};
pub use readiness::{CategoryAssessment, ReadinessCategory, SalesReadinessAnalysis};
pub use scenario::{
    BaselineFinancials, CompanyProfile, GlideShape, GrowthModel, MarginPath, ScenarioAssumptions,
    ScenarioKind, ScenarioSet,
};
