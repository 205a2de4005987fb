//! Sales-readiness assessment inputs.
//!
//! The readiness analysis is produced by an external collaborator
//! (assessment UI plus suggestion services) and consumed as-is by the
//! adjustment factor engine. Scores run 1-10 per category; value impacts
//! are percentages that translate into multiplicative factors.

use std::collections::BTreeMap;

/// The eight assessed readiness categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadinessCategory {
    /// Revenue concentration across the customer base
    CustomerConcentration,
    /// Dependency on founders or key employees
    KeyPersonDependency,
    /// Quality and durability of customer contracts
    ContractStructure,
    /// Financial reporting and controls
    Financial,
    /// Legal exposure and compliance
    Legal,
    /// Operational maturity of processes and systems
    Operational,
    /// Strategic positioning and differentiation
    Strategic,
    /// Completeness of due-diligence documentation
    Documentation,
}

impl ReadinessCategory {
    /// All categories, in reporting order.
    pub const ALL: [ReadinessCategory; 8] = [
        ReadinessCategory::CustomerConcentration,
        ReadinessCategory::KeyPersonDependency,
        ReadinessCategory::ContractStructure,
        ReadinessCategory::Financial,
        ReadinessCategory::Legal,
        ReadinessCategory::Operational,
        ReadinessCategory::Strategic,
        ReadinessCategory::Documentation,
    ];

    /// Snake-case name of this category.
    pub fn name(&self) -> &'static str {
        match self {
            ReadinessCategory::CustomerConcentration => "customer_concentration",
            ReadinessCategory::KeyPersonDependency => "key_person_dependency",
            ReadinessCategory::ContractStructure => "contract_structure",
            ReadinessCategory::Financial => "financial",
            ReadinessCategory::Legal => "legal",
            ReadinessCategory::Operational => "operational",
            ReadinessCategory::Strategic => "strategic",
            ReadinessCategory::Documentation => "documentation",
        }
    }

    /// Nominal weight of this category in the overall blend.
    ///
    /// The nominal weights sum to 1.0; the factor engine renormalises over
    /// the categories actually present in an analysis.
    pub fn nominal_weight(&self) -> f64 {
        match self {
            ReadinessCategory::CustomerConcentration => 0.20,
            ReadinessCategory::KeyPersonDependency => 0.15,
            ReadinessCategory::ContractStructure => 0.15,
            ReadinessCategory::Financial => 0.15,
            ReadinessCategory::Legal => 0.10,
            ReadinessCategory::Operational => 0.10,
            ReadinessCategory::Strategic => 0.10,
            ReadinessCategory::Documentation => 0.05,
        }
    }
}

/// One category's assessment within a readiness analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryAssessment {
    /// Qualitative score, 1 (poor) to 10 (excellent)
    pub score: f64,
    /// Weight of this category in the overall blend
    pub weight: f64,
    /// Value impact in percent; +10.0 means multiples scale by 1.10
    pub value_impact_pct: f64,
}

/// A category-scored sales-readiness analysis.
///
/// Categories may be missing; the factor engine renormalises its weighted
/// average over the weights actually present rather than the nominal total.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SalesReadinessAnalysis {
    /// Per-category assessments
    pub categories: BTreeMap<ReadinessCategory, CategoryAssessment>,
}

impl SalesReadinessAnalysis {
    /// Create an empty analysis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category assessment with its nominal weight.
    pub fn with_assessment(
        mut self,
        category: ReadinessCategory,
        score: f64,
        value_impact_pct: f64,
    ) -> Self {
        self.categories.insert(
            category,
            CategoryAssessment {
                score,
                weight: category.nominal_weight(),
                value_impact_pct,
            },
        );
        self
    }

    /// Add a category assessment with an explicit weight.
    pub fn with_weighted_assessment(
        mut self,
        category: ReadinessCategory,
        assessment: CategoryAssessment,
    ) -> Self {
        self.categories.insert(category, assessment);
        self
    }

    /// Value impact for a category, if assessed.
    pub fn impact(&self, category: ReadinessCategory) -> Option<f64> {
        self.categories.get(&category).map(|a| a.value_impact_pct)
    }

    /// Number of assessed categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether no categories were assessed.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nominal_weights_sum_to_one() {
        let total: f64 = ReadinessCategory::ALL
            .iter()
            .map(|c| c.nominal_weight())
            .sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_category_names_unique() {
        let mut names: Vec<_> = ReadinessCategory::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ReadinessCategory::ALL.len());
    }

    #[test]
    fn test_builder_uses_nominal_weight() {
        let analysis = SalesReadinessAnalysis::new().with_assessment(
            ReadinessCategory::Financial,
            7.0,
            5.0,
        );
        let assessment = analysis.categories[&ReadinessCategory::Financial];
        assert_relative_eq!(assessment.weight, 0.15);
        assert_relative_eq!(assessment.value_impact_pct, 5.0);
        assert_eq!(analysis.impact(ReadinessCategory::Financial), Some(5.0));
        assert_eq!(analysis.impact(ReadinessCategory::Legal), None);
    }

    #[test]
    fn test_empty_analysis() {
        let analysis = SalesReadinessAnalysis::new();
        assert!(analysis.is_empty());
        assert_eq!(analysis.len(), 0);
    }
}
