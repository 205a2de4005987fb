//! Valuation rescaling engine.
//!
//! Applies adjustment factors to a stored valuation snapshot. The method
//! set and the relative shape of the valuation range were frozen when the
//! original valuation completed; rescaling reuses both verbatim and only
//! moves the numbers.

use std::collections::BTreeMap;

use valuation_core::types::{
    AdjustedValuation, AdjustmentFactors, OriginalValuationSnapshot, PeriodFinancials,
    RescaleError, ValuationMethod,
};

/// Rescale a previously stored valuation under new adjustment factors.
///
/// For every method the original average included:
/// - methods insensitive to multiples (book value, asset-based) pass
///   through unchanged;
/// - multiple-based methods are rescaled as
///   `original × (new multiple / original multiple)` where the new
///   multiple is the original multiple times the method-specific factor
///   (falling back to the overall factor when no method-specific factor
///   exists).
///
/// The new average is the arithmetic mean over exactly the originally
/// included methods; which methods qualify is never re-decided here. The
/// new range applies the original low/average and high/average ratios to
/// the new average. When no method survives with a positive value the
/// average falls back to book value alone. The result is clamped to >= 0
/// unless the original valuation was itself negative.
///
/// # Errors
///
/// [`RescaleError`] only when the snapshot is internally inconsistent: it
/// includes a method without a recorded value, includes a multiple-based
/// method without a recorded multiple, or includes no methods at all.
pub fn rescale_valuation(
    snapshot: &OriginalValuationSnapshot,
    factors: &AdjustmentFactors,
    period: Option<&PeriodFinancials>,
) -> Result<AdjustedValuation, RescaleError> {
    if snapshot.included_methods.is_empty() {
        return Err(RescaleError::EmptySnapshot);
    }

    let mut method_values = BTreeMap::new();
    let mut adjusted_multiples = BTreeMap::new();

    for &method in &snapshot.included_methods {
        let original = snapshot
            .method_value(method)
            .ok_or(RescaleError::MissingMethodValue { method })?;

        if !method.is_multiple_based() {
            method_values.insert(method, original);
            continue;
        }

        let original_multiple = snapshot
            .multiple(method)
            .ok_or(RescaleError::MissingMultiple { method })?;
        let factor = factors
            .method_factor(method)
            .unwrap_or(factors.overall_factor);
        let new_multiple = original_multiple * factor;
        adjusted_multiples.insert(method, new_multiple);

        let new_value = if original_multiple.abs() > f64::EPSILON {
            original * (new_multiple / original_multiple)
        } else {
            // a zero multiple cannot be ratio-scaled; the method passes through
            tracing::debug!(method = method.name(), "zero original multiple; passing through");
            original
        };
        method_values.insert(method, new_value);
    }

    let mut equity_value =
        method_values.values().sum::<f64>() / method_values.len() as f64;

    let mut used_book_value_fallback = false;
    if !method_values.values().any(|value| *value > 0.0) {
        let book_value = snapshot
            .method_value(ValuationMethod::BookValue)
            .or_else(|| period.map(|p| p.book_value));
        if let Some(book_value) = book_value {
            tracing::warn!(
                book_value,
                "no method produced a positive value; falling back to book value"
            );
            equity_value = book_value;
            used_book_value_fallback = true;
        }
    }

    // negativity is preserved only when the original valuation was negative
    if equity_value < 0.0 && snapshot.average_value >= 0.0 {
        equity_value = 0.0;
    }

    let (low_ratio, high_ratio) = if snapshot.average_value.abs() > f64::EPSILON {
        (
            snapshot.range_low / snapshot.average_value,
            snapshot.range_high / snapshot.average_value,
        )
    } else {
        (1.0, 1.0)
    };

    Ok(AdjustedValuation {
        equity_value,
        range_low: equity_value * low_ratio,
        range_high: equity_value * high_ratio,
        adjusted_multiples,
        method_values,
        used_book_value_fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snapshot() -> OriginalValuationSnapshot {
        let mut multiples = BTreeMap::new();
        multiples.insert(ValuationMethod::RevenueMultiple, 0.5);
        multiples.insert(ValuationMethod::EbitdaMultiple, 4.0);

        let mut method_values = BTreeMap::new();
        method_values.insert(ValuationMethod::RevenueMultiple, 2_000_000.0);
        method_values.insert(ValuationMethod::EbitdaMultiple, 1_800_000.0);
        method_values.insert(ValuationMethod::BookValue, 1_000_000.0);

        OriginalValuationSnapshot {
            multiples,
            method_values,
            included_methods: vec![
                ValuationMethod::RevenueMultiple,
                ValuationMethod::EbitdaMultiple,
                ValuationMethod::BookValue,
            ],
            average_value: 1_600_000.0,
            range_low: 1_280_000.0,
            range_high: 1_920_000.0,
        }
    }

    #[test]
    fn test_single_method_rescaling_worked_example() {
        let mut multiples = BTreeMap::new();
        multiples.insert(ValuationMethod::RevenueMultiple, 0.5);
        let mut method_values = BTreeMap::new();
        method_values.insert(ValuationMethod::RevenueMultiple, 2_000_000.0);
        let snapshot = OriginalValuationSnapshot {
            multiples,
            method_values,
            included_methods: vec![ValuationMethod::RevenueMultiple],
            average_value: 2_000_000.0,
            range_low: 1_600_000.0,
            range_high: 2_400_000.0,
        };
        let factors = AdjustmentFactors {
            revenue_multiple_factor: 1.10,
            ..AdjustmentFactors::neutral()
        };

        let adjusted = rescale_valuation(&snapshot, &factors, None).unwrap();
        // 2,000,000 x (0.5 x 1.10 / 0.5) = 2,200,000
        assert_relative_eq!(
            adjusted.method_values[&ValuationMethod::RevenueMultiple],
            2_200_000.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(adjusted.equity_value, 2_200_000.0, epsilon = 1e-6);
        assert_relative_eq!(
            adjusted.adjusted_multiples[&ValuationMethod::RevenueMultiple],
            0.55,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_neutral_factors_reproduce_snapshot_exactly() {
        let adjusted =
            rescale_valuation(&snapshot(), &AdjustmentFactors::neutral(), None).unwrap();

        assert_eq!(adjusted.equity_value, 1_600_000.0);
        assert_eq!(adjusted.range_low, 1_280_000.0);
        assert_eq!(adjusted.range_high, 1_920_000.0);
        assert!(!adjusted.used_book_value_fallback);
    }

    #[test]
    fn test_book_value_passes_through() {
        let factors = AdjustmentFactors {
            revenue_multiple_factor: 1.5,
            ebitda_multiple_factor: 1.5,
            overall_factor: 1.5,
            ..AdjustmentFactors::neutral()
        };
        let adjusted = rescale_valuation(&snapshot(), &factors, None).unwrap();

        assert_relative_eq!(
            adjusted.method_values[&ValuationMethod::BookValue],
            1_000_000.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            adjusted.method_values[&ValuationMethod::RevenueMultiple],
            3_000_000.0,
            epsilon = 1e-6
        );
        // book value is never given an adjusted multiple
        assert!(!adjusted
            .adjusted_multiples
            .contains_key(&ValuationMethod::BookValue));
    }

    #[test]
    fn test_range_shape_is_preserved() {
        let factors = AdjustmentFactors {
            revenue_multiple_factor: 1.2,
            ebitda_multiple_factor: 1.2,
            ..AdjustmentFactors::neutral()
        };
        let adjusted = rescale_valuation(&snapshot(), &factors, None).unwrap();

        // original shape: low = 80% of average, high = 120%
        assert_relative_eq!(
            adjusted.range_low / adjusted.equity_value,
            0.8,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            adjusted.range_high / adjusted.equity_value,
            1.2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_method_set_is_frozen() {
        // the snapshot records a P/E value but did not include it originally
        let mut snapshot = snapshot();
        snapshot
            .method_values
            .insert(ValuationMethod::PriceEarnings, 9_000_000.0);
        snapshot
            .multiples
            .insert(ValuationMethod::PriceEarnings, 12.0);

        let adjusted =
            rescale_valuation(&snapshot, &AdjustmentFactors::neutral(), None).unwrap();
        assert!(!adjusted
            .method_values
            .contains_key(&ValuationMethod::PriceEarnings));
        assert_eq!(adjusted.equity_value, 1_600_000.0);
    }

    #[test]
    fn test_missing_method_value_is_an_error() {
        let mut snapshot = snapshot();
        snapshot
            .method_values
            .remove(&ValuationMethod::EbitdaMultiple);

        let err =
            rescale_valuation(&snapshot, &AdjustmentFactors::neutral(), None).unwrap_err();
        assert_eq!(
            err,
            RescaleError::MissingMethodValue {
                method: ValuationMethod::EbitdaMultiple
            }
        );
    }

    #[test]
    fn test_missing_multiple_is_an_error() {
        let mut snapshot = snapshot();
        snapshot.multiples.remove(&ValuationMethod::RevenueMultiple);

        let err =
            rescale_valuation(&snapshot, &AdjustmentFactors::neutral(), None).unwrap_err();
        assert_eq!(
            err,
            RescaleError::MissingMultiple {
                method: ValuationMethod::RevenueMultiple
            }
        );
    }

    #[test]
    fn test_empty_snapshot_is_an_error() {
        let mut snapshot = snapshot();
        snapshot.included_methods.clear();
        let err =
            rescale_valuation(&snapshot, &AdjustmentFactors::neutral(), None).unwrap_err();
        assert_eq!(err, RescaleError::EmptySnapshot);
    }

    #[test]
    fn test_book_value_fallback_when_nothing_positive() {
        let mut multiples = BTreeMap::new();
        multiples.insert(ValuationMethod::RevenueMultiple, 0.4);
        let mut method_values = BTreeMap::new();
        method_values.insert(ValuationMethod::RevenueMultiple, -500_000.0);
        let snapshot = OriginalValuationSnapshot {
            multiples,
            method_values,
            included_methods: vec![ValuationMethod::RevenueMultiple],
            average_value: 100_000.0,
            range_low: 80_000.0,
            range_high: 120_000.0,
        };
        let period = PeriodFinancials {
            book_value: 350_000.0,
            ..PeriodFinancials::default()
        };

        let adjusted = rescale_valuation(
            &snapshot,
            &AdjustmentFactors::neutral(),
            Some(&period),
        )
        .unwrap();
        assert!(adjusted.used_book_value_fallback);
        assert_relative_eq!(adjusted.equity_value, 350_000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_average_clamped_when_original_positive() {
        let mut multiples = BTreeMap::new();
        multiples.insert(ValuationMethod::RevenueMultiple, 0.4);
        let mut method_values = BTreeMap::new();
        method_values.insert(ValuationMethod::RevenueMultiple, -200_000.0);
        let snapshot = OriginalValuationSnapshot {
            multiples,
            method_values,
            included_methods: vec![ValuationMethod::RevenueMultiple],
            average_value: 50_000.0,
            range_low: 40_000.0,
            range_high: 60_000.0,
        };

        let adjusted =
            rescale_valuation(&snapshot, &AdjustmentFactors::neutral(), None).unwrap();
        assert_eq!(adjusted.equity_value, 0.0);
        assert_eq!(adjusted.range_low, 0.0);
        assert_eq!(adjusted.range_high, 0.0);
    }

    #[test]
    fn test_intrinsic_negativity_is_preserved() {
        // heavily indebted company: the original valuation was negative
        let mut method_values = BTreeMap::new();
        method_values.insert(ValuationMethod::BookValue, -400_000.0);
        let snapshot = OriginalValuationSnapshot {
            multiples: BTreeMap::new(),
            method_values,
            included_methods: vec![ValuationMethod::BookValue],
            average_value: -400_000.0,
            range_low: -480_000.0,
            range_high: -320_000.0,
        };

        let adjusted =
            rescale_valuation(&snapshot, &AdjustmentFactors::neutral(), None).unwrap();
        assert!(adjusted.equity_value < 0.0);
        assert_relative_eq!(adjusted.equity_value, -400_000.0, epsilon = 1e-12);
        // range shape preserved around the negative average
        assert_relative_eq!(adjusted.range_low, -480_000.0, epsilon = 1e-6);
        assert_relative_eq!(adjusted.range_high, -320_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_method_specific_factor_wins_over_overall() {
        let factors = AdjustmentFactors {
            overall_factor: 1.25,
            ..AdjustmentFactors::neutral()
        };
        let adjusted = rescale_valuation(&snapshot(), &factors, None).unwrap();
        assert_relative_eq!(
            adjusted.method_values[&ValuationMethod::RevenueMultiple],
            2_000_000.0,
            epsilon = 1e-6
        );
    }
}
