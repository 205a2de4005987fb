//! # valuation_adjust: Multiple Adjustment and Valuation Rescaling
//!
//! ## Layer 3 (Application) Role
//!
//! valuation_adjust recomputes a company's equity value when a qualitative
//! sales-readiness assessment changes the multiples applied to prior
//! valuation outputs:
//!
//! ```text
//! readiness analysis ──▶ factors/  ──▶ AdjustmentFactors
//!                                            │
//! OriginalValuationSnapshot ──▶ rescale/ ◀───┘
//!                                  │
//!                                  ▼
//!                          AdjustedValuation
//! ```
//!
//! Both engines sit in a pipeline where partial data is the norm, so they
//! favour graceful degradation over raising: malformed readiness input
//! yields neutral factors, and a rescaling with no surviving positive
//! method value falls back to book value. The only hard error is an
//! internally inconsistent snapshot.
//!
//! ## Example
//!
//! ```
//! use valuation_adjust::compute_adjustment_factors;
//! use valuation_core::{ReadinessCategory, SalesReadinessAnalysis};
//!
//! let analysis = SalesReadinessAnalysis::new()
//!     .with_assessment(ReadinessCategory::Financial, 8.0, 6.0)
//!     .with_assessment(ReadinessCategory::CustomerConcentration, 4.0, -10.0);
//!
//! let factors = compute_adjustment_factors(&analysis);
//! // concentrated revenue drags the revenue multiple down ...
//! assert!(factors.revenue_multiple_factor < 1.0);
//! // ... while solid financials lift the earnings multiple
//! assert!(factors.pe_multiple_factor > 1.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

mod factors;
mod rescale;

pub use factors::{compute_adjustment_factors, FACTOR_BOUNDS};
pub use rescale::rescale_valuation;
