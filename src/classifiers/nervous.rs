//! Nervous-system classifier (Blueprint protocol)
//!
//! Classifies autonomic balance from HRV deviation against a 30-day
//! baseline, flags sympathetic drive from RHR elevation over the rolling
//! 30-day low, and reports the day's stress balance ratio.

use crate::config::Thresholds;
use crate::stats::{self, TrendEstimate, TrendLabel};
use crate::types::Window;
use serde::{Deserialize, Serialize};

/// Autonomic balance classification from the HRV z-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutonomicBalance {
    /// z below the lower band: sympathetic dominance
    SympatheticDominance,
    /// z above the upper band: well-recovered, ready for load
    PeakPerformanceWindow,
    Balanced,
    /// Too little HRV history for a meaningful z-score
    InsufficientData,
}

impl AutonomicBalance {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutonomicBalance::SympatheticDominance => "Unbalanced (Sympathetic Dominance)",
            AutonomicBalance::PeakPerformanceWindow => "Peak Performance Window",
            AutonomicBalance::Balanced => "Balanced",
            AutonomicBalance::InsufficientData => "Insufficient Data",
        }
    }
}

/// Today's readings plus the historical windows the classifier consumes
#[derive(Debug, Clone)]
pub struct NervousInputs {
    pub hrv_today_ms: Option<f64>,
    /// 30-day HRV baseline window (ends the day before the analysis date)
    pub hrv_window: Window,
    pub rhr_today_bpm: Option<f64>,
    /// 30-day RHR window; its minimum is the rolling low
    pub rhr_window: Window,
    /// 7-day RHR window for the short-term trend
    pub rhr_trend_window: Window,
    pub high_stress_minutes: Option<f64>,
    pub rest_stress_minutes: Option<f64>,
}

/// Structured nervous-system verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NervousVerdict {
    pub hrv_today_ms: Option<f64>,
    pub hrv_baseline_30d_ms: Option<f64>,
    /// Percentage deviation of today's HRV from the 30-day baseline
    pub hrv_deviation_pct: Option<f64>,
    pub hrv_z_score: Option<f64>,
    pub insufficient_variance: bool,
    pub balance: AutonomicBalance,
    /// Strained / Optimal / Peaking, from the baseline deviation
    pub recovery_status: Option<&'static str>,
    pub rhr_today_bpm: Option<f64>,
    pub rhr_lowest_30d_bpm: Option<f64>,
    pub rhr_trend: TrendEstimate,
    /// RHR elevated more than the threshold over the 30-day low
    pub sympathetic_drive_elevated: Option<bool>,
    /// High-stress share of tracked stress time, in [0, 1]
    pub stress_balance_ratio: Option<f64>,
    pub high_stress_minutes: Option<f64>,
    pub rest_stress_minutes: Option<f64>,
    pub insight: String,
}

/// Classify the nervous system for one day
pub fn classify(inputs: &NervousInputs, thresholds: &Thresholds) -> NervousVerdict {
    let hrv_baseline = stats::baseline(&inputs.hrv_window);

    // A z-score needs at least 2 window samples and a reading for today;
    // anything less degrades to Insufficient Data instead of a spurious score.
    let (hrv_z, insufficient_variance, balance) = match inputs.hrv_today_ms {
        Some(today) if inputs.hrv_window.len() >= 2 => {
            let z = stats::deviation(today, &inputs.hrv_window);
            let balance = if z.value < thresholds.hrv_unbalanced_z {
                AutonomicBalance::SympatheticDominance
            } else if z.value > thresholds.hrv_peak_z {
                AutonomicBalance::PeakPerformanceWindow
            } else {
                AutonomicBalance::Balanced
            };
            (Some(z.value), z.insufficient_variance, balance)
        }
        _ => (None, false, AutonomicBalance::InsufficientData),
    };

    let hrv_deviation_pct = match (inputs.hrv_today_ms, hrv_baseline) {
        (Some(today), Some(base)) => stats::percent_change(today, base),
        _ => None,
    };

    let recovery_status = hrv_deviation_pct.map(|dev| {
        if dev < -thresholds.recovery_deviation_pct {
            "Strained"
        } else if dev > thresholds.recovery_deviation_pct {
            "Peaking"
        } else {
            "Optimal"
        }
    });

    let rhr_lowest = inputs.rhr_window.min_value();
    let sympathetic_drive_elevated = match (inputs.rhr_today_bpm, rhr_lowest) {
        (Some(today), Some(low)) => Some(today - low > thresholds.rhr_elevation_threshold_bpm),
        _ => None,
    };

    let rhr_trend = stats::trend(&inputs.rhr_trend_window, thresholds.stable_slope_band);

    let stress_balance_ratio = match (inputs.high_stress_minutes, inputs.rest_stress_minutes) {
        (Some(high), Some(rest)) if high + rest > 0.0 => Some(high / (high + rest)),
        _ => None,
    };

    let insight = build_insight(
        balance,
        recovery_status,
        sympathetic_drive_elevated,
        rhr_trend.label,
    );

    NervousVerdict {
        hrv_today_ms: inputs.hrv_today_ms,
        hrv_baseline_30d_ms: hrv_baseline,
        hrv_deviation_pct,
        hrv_z_score: hrv_z,
        insufficient_variance,
        balance,
        recovery_status,
        rhr_today_bpm: inputs.rhr_today_bpm,
        rhr_lowest_30d_bpm: rhr_lowest,
        rhr_trend,
        sympathetic_drive_elevated,
        stress_balance_ratio,
        high_stress_minutes: inputs.high_stress_minutes,
        rest_stress_minutes: inputs.rest_stress_minutes,
        insight,
    }
}

fn build_insight(
    balance: AutonomicBalance,
    recovery_status: Option<&'static str>,
    drive_elevated: Option<bool>,
    rhr_trend: TrendLabel,
) -> String {
    let mut parts: Vec<&str> = Vec::new();

    match balance {
        AutonomicBalance::SympatheticDominance => {
            parts.push("HRV is significantly below baseline - prioritize recovery today.");
        }
        AutonomicBalance::PeakPerformanceWindow => {
            parts.push("HRV is elevated above baseline - good day for high-intensity training.");
        }
        AutonomicBalance::Balanced => {}
        AutonomicBalance::InsufficientData => {
            parts.push("Not enough HRV history for a baseline comparison.");
        }
    }

    match recovery_status {
        Some("Strained") => {
            parts.push("Nervous system shows signs of strain. Avoid intense stressors.");
        }
        Some("Peaking") => {
            parts.push("Nervous system is well-recovered. Optimal window for performance.");
        }
        _ => {}
    }

    if drive_elevated == Some(true) {
        parts.push("RHR elevated above the 30-day low - indicates suppressed recovery.");
    }

    match rhr_trend {
        TrendLabel::Ascending => {
            parts.push("RHR trending upward over 7 days - monitor for overtraining signs.");
        }
        TrendLabel::Descending => {
            parts.push("RHR trending downward - positive adaptation signal.");
        }
        TrendLabel::Stable => {}
    }

    if parts.is_empty() {
        "HRV within normal range.".to_string()
    } else {
        parts.join(" ")
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

    fn base_inputs() -> NervousInputs {
        NervousInputs {
            hrv_today_ms: Some(55.0),
            hrv_window: make_window(&[52.0, 54.0, 55.0, 56.0, 58.0]),
            rhr_today_bpm: Some(54.0),
            rhr_window: make_window(&[52.0, 53.0, 54.0, 55.0]),
            rhr_trend_window: make_window(&[53.0, 54.0, 54.0]),
            high_stress_minutes: Some(30.0),
            rest_stress_minutes: Some(120.0),
        }
    }

    #[test]
    fn test_balanced_classification() {
        let verdict = classify(&base_inputs(), &Thresholds::default());
        assert_eq!(verdict.balance, AutonomicBalance::Balanced);
        assert!(verdict.hrv_z_score.is_some());
        assert!(!verdict.insufficient_variance);
    }

    #[test]
    fn test_sympathetic_dominance_band() {
        let mut inputs = base_inputs();
        // mean 55, sample stdev ≈ 2.236; z for 42 ≈ -5.8
        inputs.hrv_today_ms = Some(42.0);
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.balance, AutonomicBalance::SympatheticDominance);
        assert!(verdict.hrv_z_score.unwrap() < -1.5);
        assert_eq!(verdict.recovery_status, Some("Strained"));
    }

    #[test]
    fn test_peak_performance_band() {
        let mut inputs = base_inputs();
        inputs.hrv_today_ms = Some(70.0);
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.balance, AutonomicBalance::PeakPerformanceWindow);
    }

    #[test]
    fn test_insufficient_hrv_history() {
        let mut inputs = base_inputs();
        inputs.hrv_window = make_window(&[55.0]);
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.balance, AutonomicBalance::InsufficientData);
        assert!(verdict.hrv_z_score.is_none());
        assert_eq!(verdict.balance.as_str(), "Insufficient Data");
    }

    #[test]
    fn test_missing_today_reading() {
        let mut inputs = base_inputs();
        inputs.hrv_today_ms = None;
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.balance, AutonomicBalance::InsufficientData);
        assert!(verdict.hrv_deviation_pct.is_none());
    }

    #[test]
    fn test_sympathetic_drive_elevation() {
        let mut inputs = base_inputs();
        // 30-day low is 52; 56 is 4 bpm above, past the 3 bpm threshold
        inputs.rhr_today_bpm = Some(56.0);
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.sympathetic_drive_elevated, Some(true));

        // Exactly 3 bpm above the low is not elevated
        inputs.rhr_today_bpm = Some(55.0);
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.sympathetic_drive_elevated, Some(false));
    }

    #[test]
    fn test_drive_unknown_without_rhr() {
        let mut inputs = base_inputs();
        inputs.rhr_today_bpm = None;
        let verdict = classify(&inputs, &Thresholds::default());
        assert!(verdict.sympathetic_drive_elevated.is_none());
    }

    #[test]
    fn test_insight_tracks_rhr_trend() {
        let mut inputs = base_inputs();
        inputs.rhr_trend_window = make_window(&[52.0, 54.0, 56.0]);
        let verdict = classify(&inputs, &Thresholds::default());
        assert!(verdict.insight.contains("monitor for overtraining signs"));

        inputs.rhr_trend_window = make_window(&[56.0, 54.0, 52.0]);
        let verdict = classify(&inputs, &Thresholds::default());
        assert!(verdict.insight.contains("positive adaptation signal"));
    }

    #[test]
    fn test_stress_balance_ratio() {
        let verdict = classify(&base_inputs(), &Thresholds::default());
        // 30 high / 150 tracked
        assert!((verdict.stress_balance_ratio.unwrap() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_stress_ratio_zero_tracked_minutes() {
        let mut inputs = base_inputs();
        inputs.high_stress_minutes = Some(0.0);
        inputs.rest_stress_minutes = Some(0.0);
        let verdict = classify(&inputs, &Thresholds::default());
        assert!(verdict.stress_balance_ratio.is_none());
    }
}
