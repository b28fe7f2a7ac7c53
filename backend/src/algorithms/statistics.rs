//! Descriptive statistics over plain `f64` slices.
//!
//! Every function has an explicit fallback for empty or degenerate input
//! instead of returning NaN. Callers are expected to pass finite values only;
//! any finite input, up to `f64::MAX` in magnitude, yields a finite result.

use std::cmp::Ordering;

/// Power of two close to the largest magnitude in `values`, or 1.
///
/// Dividing by a power of two is exact, so sums over the scaled values round
/// exactly like the unscaled ones while staying far from overflow.
fn magnitude_scale(values: &[f64]) -> f64 {
    let largest = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if largest == 0.0 || !largest.is_finite() {
        return 1.0;
    }
    let exponent = (largest.log2().floor() as i32).clamp(-1000, 1023);
    2f64.powi(exponent)
}

/// Arithmetic mean, or 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let scale = magnitude_scale(values);
    let scaled_sum: f64 = values.iter().map(|v| v / scale).sum();
    let (low, high) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    (scaled_sum / values.len() as f64 * scale).max(low).min(high)
}

/// Copy of `values` sorted ascending.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Median of an already sorted slice, or 0 when empty.
///
/// For an even count the two middle values are averaged.
pub fn median_sorted(sorted: &[f64]) -> f64 {
    let count = sorted.len();
    if count == 0 {
        return 0.0;
    }
    if count % 2 == 0 {
        sorted[count / 2 - 1] / 2.0 + sorted[count / 2] / 2.0
    } else {
        sorted[count / 2]
    }
}

/// Quantile `q` in `[0, 1]` of an already sorted slice, or 0 when empty.
///
/// Interpolates linearly between the two closest order statistics
/// (position `q * (n - 1)`).
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = position - lower as f64;
    let (low, high) = (sorted[lower], sorted[upper]);
    let span = high - low;
    let value = if span.is_finite() {
        low + fraction * span
    } else {
        low * (1.0 - fraction) + high * fraction
    };
    value.max(low).min(high)
}

/// Pearson correlation coefficient of two equally long series.
///
/// Returns 0 when the series differ in length, hold fewer than two values,
/// or either of them has zero variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }

    // r is scale invariant; working on scaled values keeps every sum finite
    let scale_x = magnitude_scale(x);
    let scale_y = magnitude_scale(y);
    let x: Vec<f64> = x.iter().map(|v| v / scale_x).collect();
    let y: Vec<f64> = y.iter().map(|v| v / scale_y).collect();

    let mean_x = mean(&x);
    let mean_y = mean(&y);

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    if sum_sq_x == 0.0 || sum_sq_y == 0.0 {
        return 0.0;
    }

    let r = numerator / (sum_sq_x.sqrt() * sum_sq_y.sqrt());
    // Rounding noise can push |r| marginally past 1
    r.clamp(-1.0, 1.0)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Magnitudes this large carry no fractional digits
        return value;
    }
    let rounded = scaled.round() / factor;
    // Normalise -0.0 so serialized output never shows "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median_sorted(&[1.0, 2.0, 9.0]), 2.0);
        assert_eq!(median_sorted(&[2.0, 4.0, 6.0, 8.0]), 5.0);
        assert_eq!(median_sorted(&[]), 0.0);
    }

    #[test]
    fn test_sorted_does_not_touch_input() {
        let values = vec![3.0, 1.0, 2.0];
        assert_eq!(sorted(&values), vec![1.0, 2.0, 3.0]);
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let values = [10.0, 20.0, 30.0, 1000.0];
        // position 0.75 between 10 and 20
        assert!((quantile_sorted(&values, 0.25) - 17.5).abs() < 1e-12);
        // position 2.25 between 30 and 1000
        assert!((quantile_sorted(&values, 0.75) - 272.5).abs() < 1e-12);
        assert_eq!(quantile_sorted(&values, 0.0), 10.0);
        assert_eq!(quantile_sorted(&values, 1.0), 1000.0);
        assert_eq!(quantile_sorted(&[], 0.5), 0.0);
        assert_eq!(quantile_sorted(&[7.0], 0.25), 7.0);
    }

    #[test]
    fn test_pearson_perfect_positive_and_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson_correlation(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson_correlation(&x, &z) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_inputs() {
        assert_eq!(pearson_correlation(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson_correlation(&[1.0, 2.0], &[3.0]), 0.0);
        assert_eq!(pearson_correlation(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.12345, 2), 0.12);
        assert_eq!(round_to(0.125_1, 2), 0.13);
        assert_eq!(round_to(-0.001, 2), 0.0);
        assert!(round_to(-0.001, 2).is_sign_positive());
        assert_eq!(round_to(f64::MAX, 2), f64::MAX);
        assert_eq!(round_to(-1.7e308, 3), -1.7e308);
    }

    #[test]
    fn test_mean_of_huge_values_is_finite() {
        assert_eq!(mean(&[1e308, 1e308]), 1e308);
        assert_eq!(mean(&[f64::MAX, f64::MAX, f64::MAX]), f64::MAX);
        let m = mean(&[1e308, 1e308, 1.7e308]);
        assert!(m.is_finite());
        assert!((m / 1.2333333333333334e308 - 1.0).abs() < 1e-12);
        assert_eq!(mean(&[f64::MAX, -f64::MAX]), 0.0);
    }

    #[test]
    fn test_median_and_quantile_of_huge_values() {
        assert_eq!(median_sorted(&[f64::MAX, f64::MAX]), f64::MAX);
        assert_eq!(median_sorted(&[-f64::MAX, f64::MAX]), 0.0);
        let q = quantile_sorted(&[-1e308, 1.7e308], 0.25);
        assert!(q.is_finite());
        assert!((q / -3.25e307 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_with_huge_values() {
        let pressure = [1e308, -1e308, 1e200];
        let temperature = [1.0, 2.0, 3.0];
        let r = pearson_correlation(&pressure, &temperature);
        assert!(r.is_finite());
        assert!((-1.0..=1.0).contains(&r));

        let x = [f64::MAX, -f64::MAX, f64::MAX / 2.0];
        let y = [2.0, -2.0, 1.0];
        assert!((pearson_correlation(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_unchanged_for_ordinary_values() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        // Sxy = 8, Sxx = Syy = 10
        assert!((pearson_correlation(&x, &y) - 0.8).abs() < 1e-12);
    }
}
