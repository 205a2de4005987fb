//! Three-scenario DCF orchestration.
//!
//! The calculator runs the full projection → terminal value → bridge
//! pipeline once per scenario. Scenarios are independent; they are
//! computed in parallel and a failure in one is returned as that
//! scenario's typed error without blocking the other two.

use valuation_core::types::{
    BaselineFinancials, CompanyProfile, DcfResult, ScenarioComputation, ScenarioKind,
    ScenarioOutcome, ScenarioSet,
};

use crate::bridge::build_bridge;
use crate::projector::project_scenario;
use crate::terminal::compute_terminal_value;

/// End-to-end DCF calculator for one valuation run.
///
/// Stateless apart from its configuration; computing is side-effect-free
/// and deterministic, so re-running with identical inputs produces
/// identical output regardless of the execution mode.
///
/// # Example
///
/// ```
/// use valuation_core::{
///     BaselineFinancials, CompanyProfile, GrowthModel, MarginPath,
///     ScenarioAssumptions, ScenarioSet,
/// };
/// use valuation_dcf::DcfCalculator;
///
/// let assumptions = ScenarioAssumptions {
///     growth: GrowthModel::HistoricalCagr { cagr: 0.08 },
///     margins: MarginPath::Explicit(vec![0.18]),
///     capex_rate: 0.05,
///     working_capital_rate: 0.08,
///     depreciation_rate: 0.04,
///     terminal_growth: 0.02,
///     discount_rate: 0.11,
///     tax_rate: 0.25,
/// };
/// let calculator = DcfCalculator::new(CompanyProfile::Established);
/// let result = calculator.compute(
///     &ScenarioSet::uniform(assumptions),
///     &BaselineFinancials::new(2_500_000.0, 250_000.0, 400_000.0, 2025),
/// );
/// assert!(result.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct DcfCalculator {
    profile: CompanyProfile,
    parallel: bool,
}

impl DcfCalculator {
    /// Create a calculator for the given company profile.
    ///
    /// Scenarios are computed in parallel.
    pub fn new(profile: CompanyProfile) -> Self {
        Self {
            profile,
            parallel: true,
        }
    }

    /// Create a calculator that computes the scenarios sequentially.
    ///
    /// Output is identical to the parallel mode; this exists for callers
    /// that are already saturating their thread pool.
    pub fn sequential(profile: CompanyProfile) -> Self {
        Self {
            profile,
            parallel: false,
        }
    }

    /// The company profile this calculator was built for.
    pub fn profile(&self) -> CompanyProfile {
        self.profile
    }

    /// Compute all three scenarios.
    pub fn compute(&self, scenarios: &ScenarioSet, baseline: &BaselineFinancials) -> DcfResult {
        let run = |kind: ScenarioKind| self.compute_scenario(kind, scenarios, baseline);

        let (pessimistic, base, optimistic) = if self.parallel {
            let ((pessimistic, base), optimistic) = rayon::join(
                || {
                    rayon::join(
                        || run(ScenarioKind::Pessimistic),
                        || run(ScenarioKind::Base),
                    )
                },
                || run(ScenarioKind::Optimistic),
            );
            (pessimistic, base, optimistic)
        } else {
            (
                run(ScenarioKind::Pessimistic),
                run(ScenarioKind::Base),
                run(ScenarioKind::Optimistic),
            )
        };

        DcfResult {
            pessimistic,
            base,
            optimistic,
        }
    }

    /// Compute a single scenario end to end.
    pub fn compute_scenario(
        &self,
        kind: ScenarioKind,
        scenarios: &ScenarioSet,
        baseline: &BaselineFinancials,
    ) -> ScenarioComputation {
        let assumptions = scenarios.get(kind);
        let horizon = self.profile.horizon();

        let projections = project_scenario(kind, assumptions, baseline, horizon)?;
        // projections are non-empty for any positive horizon
        let final_year = projections
            .last()
            .expect("positive horizon yields at least one projection row");
        let terminal_value = compute_terminal_value(final_year, assumptions, horizon);
        let bridge = build_bridge(&projections, &terminal_value, self.profile, baseline.net_debt);

        Ok(ScenarioOutcome {
            scenario: kind,
            projections,
            terminal_value,
            bridge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use valuation_core::types::{GrowthModel, MarginPath, ScenarioAssumptions, ScenarioError};

    fn assumptions(cagr: f64) -> ScenarioAssumptions {
        ScenarioAssumptions {
            growth: GrowthModel::HistoricalCagr { cagr },
            margins: MarginPath::Explicit(vec![0.20]),
            capex_rate: 0.05,
            working_capital_rate: 0.10,
            depreciation_rate: 0.04,
            terminal_growth: 0.03,
            discount_rate: 0.10,
            tax_rate: 0.25,
        }
    }

    fn scenario_set() -> ScenarioSet {
        ScenarioSet {
            pessimistic: assumptions(0.02),
            base: assumptions(0.10),
            optimistic: assumptions(0.18),
        }
    }

    fn baseline() -> BaselineFinancials {
        BaselineFinancials::new(1_000_000.0, 100_000.0, 150_000.0, 2025)
    }

    #[test]
    fn test_all_scenarios_complete() {
        let calculator = DcfCalculator::new(CompanyProfile::Established);
        let result = calculator.compute(&scenario_set(), &baseline());

        assert!(result.is_complete());
        for outcome in result.completed() {
            assert_eq!(outcome.projections.len(), 5);
        }
    }

    #[test]
    fn test_scenario_ordering_of_equity_values() {
        let calculator = DcfCalculator::new(CompanyProfile::Established);
        let result = calculator.compute(&scenario_set(), &baseline());

        let pessimistic = result.equity_value(ScenarioKind::Pessimistic).unwrap();
        let base = result.equity_value(ScenarioKind::Base).unwrap();
        let optimistic = result.equity_value(ScenarioKind::Optimistic).unwrap();
        assert!(pessimistic < base);
        assert!(base < optimistic);
    }

    #[test]
    fn test_parallel_and_sequential_agree_exactly() {
        let parallel = DcfCalculator::new(CompanyProfile::Established);
        let sequential = DcfCalculator::sequential(CompanyProfile::Established);

        let a = parallel.compute(&scenario_set(), &baseline());
        let b = sequential.compute(&scenario_set(), &baseline());
        assert_eq!(a, b);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let calculator = DcfCalculator::new(CompanyProfile::EarlyStage);
        let a = calculator.compute(&scenario_set(), &baseline());
        let b = calculator.compute(&scenario_set(), &baseline());
        assert_eq!(a, b);
    }

    #[test]
    fn test_one_failed_scenario_does_not_block_the_others() {
        let mut scenarios = scenario_set();
        scenarios.pessimistic.growth = GrowthModel::Explicit(Vec::new());

        let calculator = DcfCalculator::new(CompanyProfile::Established);
        let result = calculator.compute(&scenarios, &baseline());

        assert!(!result.is_complete());
        assert!(matches!(
            result.pessimistic,
            Err(ScenarioError::MissingAssumption { .. })
        ));
        assert!(result.base.is_ok());
        assert!(result.optimistic.is_ok());
    }

    #[test]
    fn test_early_stage_uses_longer_horizon_and_deeper_discount() {
        let calculator = DcfCalculator::new(CompanyProfile::EarlyStage);
        let result = calculator.compute(&scenario_set(), &baseline());

        let outcome = result.base.as_ref().unwrap();
        assert_eq!(outcome.projections.len(), 7);
        assert_relative_eq!(outcome.bridge.marketability_discount, 0.30, epsilon = 1e-12);
    }

    #[test]
    fn test_net_debt_flows_into_equity() {
        let calculator = DcfCalculator::new(CompanyProfile::Established);
        let no_debt = BaselineFinancials::new(1_000_000.0, 100_000.0, 0.0, 2025);

        let with_debt = calculator.compute(&scenario_set(), &baseline());
        let without_debt = calculator.compute(&scenario_set(), &no_debt);

        let delta = without_debt.equity_value(ScenarioKind::Base).unwrap()
            - with_debt.equity_value(ScenarioKind::Base).unwrap();
        assert_relative_eq!(delta, 150_000.0, epsilon = 1e-6);
    }
}
