//! Rate mathematics shared by the projection and adjustment layers.
//!
//! Small pure functions only: clamps, glide interpolation, discount
//! factors. Policy constants that change a number a caller supplied
//! (clamping bounds, the breakeven window) live here so the behaviour is
//! independently testable.

/// Lower bound for any annual revenue growth rate (-50%).
pub const MIN_GROWTH_RATE: f64 = -0.50;

/// Upper bound for any annual revenue growth rate (+100%).
pub const MAX_GROWTH_RATE: f64 = 1.00;

/// Lower bound for any projected EBITDA margin (-20%).
pub const MIN_EBITDA_MARGIN: f64 = -0.20;

/// Upper bound for any projected EBITDA margin (+50%).
pub const MAX_EBITDA_MARGIN: f64 = 0.50;

/// Number of years over which a negative starting margin is walked to
/// breakeven before the glide toward the target margin begins.
pub const BREAKEVEN_WINDOW_YEARS: usize = 3;

/// Clamp an annual revenue growth rate to
/// [`MIN_GROWTH_RATE`, `MAX_GROWTH_RATE`].
///
/// Non-finite inputs are passed through unchanged so the caller's finiteness
/// check still sees them.
#[inline]
pub fn clamp_growth_rate(rate: f64) -> f64 {
    if !rate.is_finite() {
        return rate;
    }
    rate.clamp(MIN_GROWTH_RATE, MAX_GROWTH_RATE)
}

/// Clamp an EBITDA margin to [`MIN_EBITDA_MARGIN`, `MAX_EBITDA_MARGIN`].
///
/// Non-finite inputs are passed through unchanged.
#[inline]
pub fn clamp_margin(margin: f64) -> f64 {
    if !margin.is_finite() {
        return margin;
    }
    margin.clamp(MIN_EBITDA_MARGIN, MAX_EBITDA_MARGIN)
}

/// Discount factor for a 1-based projection year.
///
/// ```text
/// D(i) = (1 + wacc)^-i
/// ```
///
/// Year 1 is the first projected year, so a cash flow one year out is
/// discounted once.
///
/// # Example
///
/// ```
/// use valuation_core::math::discount_factor;
///
/// let df = discount_factor(0.10, 1);
/// assert!((df - 1.0 / 1.10).abs() < 1e-12);
/// ```
#[inline]
pub fn discount_factor(wacc: f64, year: usize) -> f64 {
    (1.0 + wacc).powi(-(year as i32))
}

/// Smoothstep interpolation weight for `t` in [0, 1].
///
/// ```text
/// s(t) = t^2 (3 - 2t)
/// ```
///
/// Used for the S-curve margin glide: slow at both ends, steep in the
/// middle. Inputs outside [0, 1] are clamped.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation between `start` and `end` at weight `t` in [0, 1].
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t.clamp(0.0, 1.0)
}

/// Relative difference of `actual` against `expected`.
///
/// Uses the magnitude of `expected` as the denominator, with a small floor
/// so comparisons against values near zero degrade to an absolute check
/// instead of dividing by zero.
#[inline]
pub fn relative_diff(actual: f64, expected: f64) -> f64 {
    let denom = expected.abs().max(1e-9);
    (actual - expected).abs() / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp_growth_rate_bounds() {
        assert_eq!(clamp_growth_rate(-0.9), MIN_GROWTH_RATE);
        assert_eq!(clamp_growth_rate(2.5), MAX_GROWTH_RATE);
        assert_eq!(clamp_growth_rate(0.12), 0.12);
    }

    #[test]
    fn test_clamp_growth_rate_passes_non_finite() {
        assert!(clamp_growth_rate(f64::NAN).is_nan());
        assert!(clamp_growth_rate(f64::INFINITY).is_infinite());
    }

    #[test]
    fn test_clamp_margin_bounds() {
        assert_eq!(clamp_margin(-0.35), MIN_EBITDA_MARGIN);
        assert_eq!(clamp_margin(0.65), MAX_EBITDA_MARGIN);
        assert_eq!(clamp_margin(0.18), 0.18);
    }

    #[test]
    fn test_discount_factor_first_year() {
        assert_relative_eq!(discount_factor(0.10, 1), 1.0 / 1.10, epsilon = 1e-12);
    }

    #[test]
    fn test_discount_factor_compounds() {
        let wacc: f64 = 0.08;
        for year in 1..=7 {
            let expected = 1.0 / (1.0 + wacc).powi(year as i32);
            assert_relative_eq!(discount_factor(wacc, year), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_relative_eq!(smoothstep(0.5), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_smoothstep_clamps_input() {
        assert_eq!(smoothstep(-2.0), 0.0);
        assert_eq!(smoothstep(3.0), 1.0);
    }

    #[test]
    fn test_lerp() {
        assert_relative_eq!(lerp(0.0, 10.0, 0.25), 2.5, epsilon = 1e-12);
        assert_relative_eq!(lerp(-0.1, 0.0, 1.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_relative_diff_near_zero_expected() {
        // Denominator floor keeps the comparison finite
        assert!(relative_diff(1.0, 0.0).is_finite());
        assert_relative_eq!(relative_diff(105.0, 100.0), 0.05, epsilon = 1e-12);
    }

    mod property_tests {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(1000))]

            #[test]
            fn test_clamped_growth_always_in_bounds(rate in prop::num::f64::NORMAL) {
                let clamped = clamp_growth_rate(rate);
                prop_assert!(clamped >= MIN_GROWTH_RATE);
                prop_assert!(clamped <= MAX_GROWTH_RATE);
            }

            #[test]
            fn test_clamped_margin_always_in_bounds(margin in prop::num::f64::NORMAL) {
                let clamped = clamp_margin(margin);
                prop_assert!(clamped >= MIN_EBITDA_MARGIN);
                prop_assert!(clamped <= MAX_EBITDA_MARGIN);
            }

            #[test]
            fn test_smoothstep_monotone(a in 0.0f64..1.0, b in 0.0f64..1.0) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(smoothstep(lo) <= smoothstep(hi) + 1e-12);
            }

            #[test]
            fn test_discount_factor_positive(
                wacc in 0.001f64..0.5,
                year in 1usize..10,
            ) {
                let df = discount_factor(wacc, year);
                prop_assert!(df > 0.0);
                prop_assert!(df < 1.0);
            }
        }
    }
}
