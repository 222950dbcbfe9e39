//! Metabolic classifier (Attia protocol)
//!
//! Tracks weekly Zone 2 volume against the protocol goal, step cadence
//! against a trailing baseline, and flags sedentary behavior from low daily
//! activity combined with a non-ascending weekly trend.

use crate::config::Thresholds;
use crate::stats::{self, TrendEstimate, TrendLabel};
use crate::types::Window;
use serde::{Deserialize, Serialize};

/// Today's activity readings plus rolling windows
#[derive(Debug, Clone)]
pub struct MetabolicInputs {
    pub moderate_minutes_today: Option<f64>,
    pub vigorous_minutes_today: Option<f64>,
    /// 7-day moderate-minute window ending on the analysis date
    pub moderate_window: Window,
    /// 7-day total-active-minute window ending on the analysis date
    pub active_minutes_window: Window,
    pub steps_today: Option<f64>,
    /// Trailing step window (ends the day before the analysis date)
    pub steps_prior_window: Window,
}

/// Structured metabolic verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetabolicVerdict {
    pub moderate_minutes_today: Option<f64>,
    pub vigorous_minutes_today: Option<f64>,
    /// 7-day rolling sum of moderate (Zone 2) minutes
    pub weekly_zone2_minutes: f64,
    /// Progress toward the weekly goal, percent, unclamped
    pub weekly_goal_progress_pct: f64,
    pub zone2_status: &'static str,
    pub steps_today: Option<f64>,
    pub steps_baseline: Option<f64>,
    /// Step change vs the trailing baseline, percent; absent when the
    /// baseline is zero or missing
    pub steps_delta_pct: Option<f64>,
    pub activity_trend: TrendEstimate,
    /// Low daily activity with a non-ascending weekly trend
    pub sedentary: Option<bool>,
    pub insight: String,
}

/// Classify metabolic activity for one day
pub fn classify(inputs: &MetabolicInputs, thresholds: &Thresholds) -> MetabolicVerdict {
    let weekly_zone2 = inputs.moderate_window.sum();
    // Over-achievement stays unclamped; display code decides how to note it.
    let progress_pct = weekly_zone2 / thresholds.weekly_zone2_goal_min * 100.0;

    let steps_baseline = stats::baseline(&inputs.steps_prior_window);
    let steps_delta_pct = match (inputs.steps_today, steps_baseline) {
        (Some(today), Some(base)) => stats::percent_change(today, base),
        _ => None,
    };

    let activity_trend = stats::trend(&inputs.active_minutes_window, thresholds.stable_slope_band);

    let total_active_today = match (inputs.moderate_minutes_today, inputs.vigorous_minutes_today) {
        (Some(m), Some(v)) => Some(m + v),
        (Some(m), None) => Some(m),
        (None, Some(v)) => Some(v),
        (None, None) => None,
    };
    let sedentary = total_active_today.map(|active| {
        active < thresholds.low_activity_minutes && activity_trend.label != TrendLabel::Ascending
    });

    let insight = build_insight(progress_pct, sedentary);

    MetabolicVerdict {
        moderate_minutes_today: inputs.moderate_minutes_today,
        vigorous_minutes_today: inputs.vigorous_minutes_today,
        weekly_zone2_minutes: weekly_zone2,
        weekly_goal_progress_pct: progress_pct,
        zone2_status: zone2_status(progress_pct),
        steps_today: inputs.steps_today,
        steps_baseline,
        steps_delta_pct,
        activity_trend,
        sedentary,
        insight,
    }
}

fn build_insight(progress_pct: f64, sedentary: Option<bool>) -> String {
    let mut parts: Vec<String> = Vec::new();

    if progress_pct < 50.0 {
        parts.push(format!(
            "Zone 2 training at {progress_pct:.0}% of weekly goal - increase aerobic base work."
        ));
    } else if progress_pct >= 100.0 {
        parts.push(
            "Weekly Zone 2 goal achieved - mitochondrial efficiency training on track.".to_string(),
        );
    }

    if sedentary == Some(true) {
        parts.push(
            "Low activity today against a flat weekly trend - add movement throughout the day."
                .to_string(),
        );
    }

    if parts.is_empty() {
        "Activity levels support metabolic health.".to_string()
    } else {
        parts.join(" ")
    }
}

fn zone2_status(progress_pct: f64) -> &'static str {
    if progress_pct >= 100.0 {
        "Goal Achieved"
    } else if progress_pct >= 75.0 {
        "On Track"
    } else if progress_pct >= 50.0 {
        "Below Target"
    } else {
        "Needs Attention"
    }
}
