//! # valuation_dcf: Three-Scenario DCF Kernel
//!
//! ## Layer 2 (Kernel) Role
//!
//! valuation_dcf turns per-scenario assumptions into discounted-cash-flow
//! valuations and audits the arithmetic of already-computed results:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              valuation_dcf (L2)             │
//! ├─────────────────────────────────────────────┤
//! │  projector/  - year-by-year projections     │
//! │  terminal/   - perpetuity terminal value    │
//! │  bridge/     - NPV, DLOM, equity bridge     │
//! │  calculator/ - three-scenario orchestration │
//! │  validator/  - read-only arithmetic audit   │
//! └─────────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────────┐
//! │             valuation_core (L1)             │
//! │  Domain types, errors, rate mathematics     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The pipeline is pure computation: no I/O, no shared mutable state, no
//! caches. The three scenarios of a run are independent and are computed in
//! parallel with rayon; a failure in one scenario is returned as that
//! scenario's typed error without blocking the other two.
//!
//! The validator is a separate, read-only auditor: it recomputes every
//! formula from the stated inputs, compares within explicit tolerances, and
//! returns a structured report. It never raises and never mutates the
//! result it inspects.
//!
//! ## Example
//!
//! ```
//! use valuation_core::{
//!     BaselineFinancials, CompanyProfile, GrowthModel, MarginPath,
//!     ScenarioAssumptions, ScenarioSet,
//! };
//! use valuation_dcf::{validate_scenario, DcfCalculator};
//!
//! let assumptions = ScenarioAssumptions {
//!     growth: GrowthModel::HistoricalCagr { cagr: 0.10 },
//!     margins: MarginPath::Explicit(vec![0.20]),
//!     capex_rate: 0.05,
//!     working_capital_rate: 0.10,
//!     depreciation_rate: 0.04,
//!     terminal_growth: 0.03,
//!     discount_rate: 0.10,
//!     tax_rate: 0.25,
//! };
//! let scenarios = ScenarioSet::uniform(assumptions.clone());
//! let baseline = BaselineFinancials::new(1_000_000.0, 100_000.0, 0.0, 2025);
//!
//! let calculator = DcfCalculator::new(CompanyProfile::Established);
//! let result = calculator.compute(&scenarios, &baseline);
//! let outcome = result.base.as_ref().expect("base scenario completes");
//!
//! let report = validate_scenario(outcome, &assumptions, &baseline);
//! assert!(report.is_valid);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

mod bridge;
mod calculator;
mod projector;
mod terminal;
pub mod validator;

pub use bridge::build_bridge;
pub use calculator::DcfCalculator;
pub use projector::project_scenario;
pub use terminal::{compute_terminal_value, TERMINAL_GROWTH_GAP};
pub use validator::{independent_value, validate_scenario, Finding, Severity, ValidationReport};
