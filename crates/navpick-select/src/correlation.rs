//! Pairwise return correlation used by diversification.

use navpick_traits::ReturnSeries;
use navpick_traits::stats::pearson;

/// Correlation of two return series over their common dates.
///
/// The series are inner-joined on date. Degenerate pairs are treated as
/// maximally correlated and report `1.0`:
/// - either series is missing
/// - fewer than `min_overlap` common observations
/// - either aligned leg has zero variance
pub fn pair_correlation(
    a: Option<&ReturnSeries>,
    b: Option<&ReturnSeries>,
    min_overlap: usize,
) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 1.0;
    };

    let aligned = a.align(b);
    if aligned.len() < min_overlap {
        return 1.0;
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = aligned.into_iter().unzip();
    pearson(&xs, &ys).unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use navpick_traits::Date;

    fn returns(values: &[f64], offset: u64) -> ReturnSeries {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        ReturnSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + chrono::Days::new(offset + i as u64), *v))
                .collect(),
        )
    }

    fn wave(n: usize, phase: f64) -> Vec<f64> {
        (0..n).map(|i| ((i as f64) * 0.7 + phase).sin() * 0.01).collect()
    }

    #[test]
    fn test_identical_series_fully_correlated() {
        let a = returns(&wave(60, 0.0), 0);
        assert_relative_eq!(pair_correlation(Some(&a), Some(&a), 30), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_series_is_maximal() {
        let a = returns(&wave(60, 0.0), 0);
        assert_eq!(pair_correlation(Some(&a), None, 30), 1.0);
        assert_eq!(pair_correlation(None, None, 30), 1.0);
    }

    #[test]
    fn test_short_overlap_is_maximal() {
        let a = returns(&wave(40, 0.0), 0);
        let b = returns(&wave(40, 2.9), 20);
        // only 20 common dates
        assert_eq!(pair_correlation(Some(&a), Some(&b), 30), 1.0);
        assert!(pair_correlation(Some(&a), Some(&b), 20) < 1.0);
    }

    #[test]
    fn test_constant_leg_is_maximal() {
        let a = returns(&[0.0; 40], 0);
        let b = returns(&wave(40, 0.0), 0);
        assert_eq!(pair_correlation(Some(&a), Some(&b), 30), 1.0);
    }

    #[test]
    fn test_anti_correlated() {
        let up = wave(40, 0.0);
        let down: Vec<f64> = up.iter().map(|v| -v).collect();
        let corr = pair_correlation(Some(&returns(&up, 0)), Some(&returns(&down, 0)), 30);
        assert_relative_eq!(corr, -1.0, epsilon = 1e-12);
    }
}
