//! Statistics kernel
//!
//! Pure, deterministic statistics over sample windows: baseline mean,
//! z-score deviation, linear trend, and guarded ratios. Every degenerate
//! input (empty window, zero variance, zero denominator) yields an explicit
//! absence marker rather than an arithmetic fault.

use crate::types::Window;
use serde::{Deserialize, Serialize};

/// Default tolerance band for labeling a trend slope as stable, expressed in
/// the metric's native units per day.
pub const DEFAULT_STABLE_SLOPE: f64 = 0.5;

/// Minimum paired observations for a meaningful correlation
pub const MIN_CORRELATION_SAMPLES: usize = 7;

/// Z-score of a value against a window.
///
/// `insufficient_variance` is set when the window held fewer than 2 samples
/// or had zero spread; the z-score is then defined as 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScore {
    pub value: f64,
    pub insufficient_variance: bool,
}

/// Trend direction derived from a slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Ascending,
    Descending,
    Stable,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Ascending => "ascending",
            TrendLabel::Descending => "descending",
            TrendLabel::Stable => "stable",
        }
    }
}

/// First-order trend over a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendEstimate {
    /// Slope in native units per day
    pub slope: f64,
    pub label: TrendLabel,
}

impl TrendEstimate {
    pub fn stable() -> Self {
        Self {
            slope: 0.0,
            label: TrendLabel::Stable,
        }
    }
}

/// Arithmetic mean of a window's samples. `None` when the window is empty.
pub fn baseline(window: &Window) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    Some(window.sum() / window.len() as f64)
}

/// Sample standard deviation of a window. `None` with fewer than 2 samples.
pub fn std_dev(window: &Window) -> Option<f64> {
    let n = window.len();
    if n < 2 {
        return None;
    }
    let mean = window.sum() / n as f64;
    let sum_sq: f64 = window.values().map(|v| (v - mean) * (v - mean)).sum();
    Some((sum_sq / (n - 1) as f64).sqrt())
}

/// Z-score of `today` against the window's distribution.
///
/// Fewer than 2 samples or zero spread yields the insufficient-variance
/// result with z = 0.0, never a division fault.
pub fn deviation(today: f64, window: &Window) -> ZScore {
    match (baseline(window), std_dev(window)) {
        (Some(mean), Some(sd)) if sd > 0.0 => ZScore {
            value: (today - mean) / sd,
            insufficient_variance: false,
        },
        _ => ZScore {
            value: 0.0,
            insufficient_variance: true,
        },
    }
}

/// First-order trend over a window.
///
/// The slope is an ordinary-least-squares fit of value against the 0-based
/// sample index in date order (gaps between dates are not weighted).
/// `|slope| < stable_band` labels the trend stable; otherwise the sign
/// decides. Fewer than 2 samples is always stable with slope 0.
pub fn trend(window: &Window, stable_band: f64) -> TrendEstimate {
    let n = window.len();
    if n < 2 {
        return TrendEstimate::stable();
    }

    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = window.sum() / n_f;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, v) in window.values().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (v - y_mean);
        den += dx * dx;
    }

    // den is positive for any n >= 2
    let slope = num / den;
    let label = if slope.abs() < stable_band {
        TrendLabel::Stable
    } else if slope > 0.0 {
        TrendLabel::Ascending
    } else {
        TrendLabel::Descending
    };

    TrendEstimate { slope, label }
}

/// Percentage change of `current` relative to `baseline`.
///
/// A non-positive baseline cannot anchor a percentage; the result is `None`.
pub fn percent_change(current: f64, baseline: f64) -> Option<f64> {
    if baseline <= 0.0 {
        return None;
    }
    Some((current - baseline) / baseline * 100.0)
}

/// Sample Pearson correlation between two equally long series.
///
/// `None` when fewer than [`MIN_CORRELATION_SAMPLES`] pairs are available or
/// either series has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < MIN_CORRELATION_SAMPLES {
        return None;
    }

    let n_f = n as f64;
    let x_mean = xs[..n].iter().sum::<f64>() / n_f;
    let y_mean = ys[..n].iter().sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - x_mean;
        let dy = ys[i] - y_mean;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Interpret a correlation coefficient's strength
pub fn correlation_strength(coefficient: f64) -> &'static str {
    let abs = coefficient.abs();
    if abs >= 0.7 {
        "strong"
    } else if abs >= 0.4 {
        "moderate"
    } else if abs >= 0.2 {
        "weak"
    } else {
        "negligible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;
    use chrono::NaiveDate;

    fn make_window(values: &[f64]) -> Window {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(start + chrono::Duration::days(i as i64), v))
            .collect();
        Window::new(samples).unwrap()
    }

    #[test]
    fn test_baseline_mean() {
        let window = make_window(&[50.0, 55.0, 60.0]);
        assert_eq!(baseline(&window), Some(55.0));
    }

    #[test]
    fn test_baseline_empty_window() {
        assert!(baseline(&Window::empty()).is_none());
    }

    #[test]
    fn test_deviation_finite_z() {
        let window = make_window(&[52.0, 54.0, 56.0, 58.0]);
        let z = deviation(60.0, &window);
        assert!(!z.insufficient_variance);
        // mean 55, sample stdev sqrt(20/3) ≈ 2.582
        let expected = (60.0 - 55.0) / (20.0f64 / 3.0).sqrt();
        assert!((z.value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_deviation_zero_variance() {
        let window = make_window(&[55.0, 55.0, 55.0]);
        let z = deviation(42.0, &window);
        assert!(z.insufficient_variance);
        assert_eq!(z.value, 0.0);
    }

    #[test]
    fn test_deviation_short_window() {
        let z = deviation(42.0, &make_window(&[55.0]));
        assert!(z.insufficient_variance);
        assert_eq!(z.value, 0.0);

        let z = deviation(42.0, &Window::empty());
        assert!(z.insufficient_variance);
        assert_eq!(z.value, 0.0);
    }

    #[test]
    fn test_trend_constant_is_stable() {
        let window = make_window(&[60.0, 60.0, 60.0, 60.0, 60.0]);
        let t = trend(&window, DEFAULT_STABLE_SLOPE);
        assert_eq!(t.label, TrendLabel::Stable);
        assert!(t.slope.abs() < 1e-12);
    }

    #[test]
    fn test_trend_ascending() {
        let window = make_window(&[50.0, 52.0, 54.0, 56.0, 58.0]);
        let t = trend(&window, DEFAULT_STABLE_SLOPE);
        assert_eq!(t.label, TrendLabel::Ascending);
        assert!((t.slope - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_descending() {
        let window = make_window(&[58.0, 56.0, 54.0, 52.0, 50.0]);
        let t = trend(&window, DEFAULT_STABLE_SLOPE);
        assert_eq!(t.label, TrendLabel::Descending);
        assert!((t.slope + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_within_band_is_stable() {
        // Slope 0.25 per day sits inside the 0.5 default band
        let window = make_window(&[60.0, 60.25, 60.5, 60.75, 61.0]);
        let t = trend(&window, DEFAULT_STABLE_SLOPE);
        assert_eq!(t.label, TrendLabel::Stable);
    }

    #[test]
    fn test_trend_short_window() {
        let t = trend(&make_window(&[60.0]), DEFAULT_STABLE_SLOPE);
        assert_eq!(t.label, TrendLabel::Stable);
        assert_eq!(t.slope, 0.0);
    }

    #[test]
    fn test_percent_change_guards_zero_baseline() {
        assert!(percent_change(100.0, 0.0).is_none());
        assert!(percent_change(100.0, -5.0).is_none());
        let delta = percent_change(42.0, 55.0).unwrap();
        assert!((delta - (-23.636363)).abs() < 0.001);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-9);

        let ys_neg: Vec<f64> = xs.iter().map(|x| -x).collect();
        let r = pearson(&xs, &ys_neg).unwrap();
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_guards() {
        // Too few pairs
        assert!(pearson(&[1.0, 2.0], &[2.0, 4.0]).is_none());
        // Zero variance
        let xs = vec![5.0; 10];
        let ys: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert!(pearson(&xs, &ys).is_none());
    }

    #[test]
    fn test_correlation_strength_bands() {
        assert_eq!(correlation_strength(0.85), "strong");
        assert_eq!(correlation_strength(-0.5), "moderate");
        assert_eq!(correlation_strength(0.25), "weak");
        assert_eq!(correlation_strength(0.1), "negligible");
    }
}
