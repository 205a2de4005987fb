//! Adjustment factor engine.
//!
//! Maps a category-scored readiness analysis into per-method
//! multiplicative adjustment factors. Never raises: malformed or missing
//! input degrades to neutral factors.

use std::collections::BTreeMap;

use valuation_core::types::{AdjustmentFactors, ReadinessCategory, SalesReadinessAnalysis};

/// Bounds applied to every computed factor.
///
/// A readiness assessment cannot move any multiple by more than
/// halving-or-doubling without manual review.
pub const FACTOR_BOUNDS: (f64, f64) = (0.5, 2.0);

// Method-specific blend weights are domain constants of the valuation
// methodology, not configuration.
const REVENUE_MULTIPLE_BLEND: [(ReadinessCategory, f64); 4] = [
    (ReadinessCategory::CustomerConcentration, 0.35),
    (ReadinessCategory::ContractStructure, 0.30),
    (ReadinessCategory::Strategic, 0.25),
    (ReadinessCategory::Documentation, 0.10),
];

const EBIT_MULTIPLE_BLEND: [(ReadinessCategory, f64); 4] = [
    (ReadinessCategory::Financial, 0.30),
    (ReadinessCategory::Operational, 0.25),
    (ReadinessCategory::KeyPersonDependency, 0.25),
    (ReadinessCategory::Legal, 0.20),
];

const EBITDA_MULTIPLE_BLEND: [(ReadinessCategory, f64); 4] = [
    (ReadinessCategory::Financial, 0.35),
    (ReadinessCategory::Operational, 0.30),
    (ReadinessCategory::CustomerConcentration, 0.20),
    (ReadinessCategory::ContractStructure, 0.15),
];

const PE_MULTIPLE_BLEND: [(ReadinessCategory, f64); 4] = [
    (ReadinessCategory::Financial, 0.40),
    (ReadinessCategory::Strategic, 0.25),
    (ReadinessCategory::Legal, 0.20),
    (ReadinessCategory::KeyPersonDependency, 0.15),
];

/// Derive adjustment factors from a readiness analysis.
///
/// Per category: `factor = 1 + impact% / 100`. The overall factor blends
/// the available category impacts weighted by the weights actually
/// present, not the nominal total, so a missing category does not bias
/// the average. The four method-specific factors use fixed blend weights
/// over the categories relevant to each multiple.
///
/// Never raises: an empty analysis, a non-finite impact or weight, or a
/// non-positive weight sum all yield [`AdjustmentFactors::neutral`].
pub fn compute_adjustment_factors(analysis: &SalesReadinessAnalysis) -> AdjustmentFactors {
    if analysis.is_empty() {
        tracing::debug!("empty readiness analysis; returning neutral factors");
        return AdjustmentFactors::neutral();
    }

    for (category, assessment) in &analysis.categories {
        if !assessment.value_impact_pct.is_finite()
            || !assessment.weight.is_finite()
            || assessment.weight < 0.0
        {
            tracing::debug!(
                category = category.name(),
                "malformed readiness assessment; returning neutral factors"
            );
            return AdjustmentFactors::neutral();
        }
    }

    let weight_sum: f64 = analysis.categories.values().map(|a| a.weight).sum();
    if weight_sum <= 0.0 {
        tracing::debug!("readiness weights sum to zero; returning neutral factors");
        return AdjustmentFactors::neutral();
    }

    let category_factors: BTreeMap<ReadinessCategory, f64> = analysis
        .categories
        .iter()
        .map(|(category, assessment)| {
            (*category, clamp_factor(1.0 + assessment.value_impact_pct / 100.0))
        })
        .collect();

    // weighted average over the weights actually used
    let weighted_impact: f64 = analysis
        .categories
        .values()
        .map(|a| a.weight * a.value_impact_pct)
        .sum();
    let overall_factor = clamp_factor(1.0 + weighted_impact / weight_sum / 100.0);

    AdjustmentFactors {
        category_factors,
        revenue_multiple_factor: blended_factor(analysis, &REVENUE_MULTIPLE_BLEND),
        ebit_multiple_factor: blended_factor(analysis, &EBIT_MULTIPLE_BLEND),
        ebitda_multiple_factor: blended_factor(analysis, &EBITDA_MULTIPLE_BLEND),
        pe_multiple_factor: blended_factor(analysis, &PE_MULTIPLE_BLEND),
        overall_factor,
    }
}

/// Fixed linear blend of category impacts for one method.
///
/// A category missing from the analysis contributes a neutral zero impact.
fn blended_factor(
    analysis: &SalesReadinessAnalysis,
    blend: &[(ReadinessCategory, f64)],
) -> f64 {
    let blended_impact: f64 = blend
        .iter()
        .map(|(category, weight)| weight * analysis.impact(*category).unwrap_or(0.0))
        .sum();
    clamp_factor(1.0 + blended_impact / 100.0)
}

fn clamp_factor(factor: f64) -> f64 {
    factor.clamp(FACTOR_BOUNDS.0, FACTOR_BOUNDS.1)
}
