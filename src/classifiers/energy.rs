//! Energy-budget classifier
//!
//! Interprets body battery dynamics: overnight recharge, the weekly resource
//! trend over daily net change, and the day's physiological stress load.

use crate::config::Thresholds;
use crate::stats::{self, TrendEstimate, TrendLabel};
use crate::types::Window;
use serde::{Deserialize, Serialize};

/// Today's battery readings plus the weekly net-change window
#[derive(Debug, Clone)]
pub struct EnergyInputs {
    /// Charge level at wake
    pub wake_charge_level: Option<f64>,
    /// Level at the start of the overnight charge (prior evening floor)
    pub overnight_start_level: Option<f64>,
    /// Day-end or minimum level for the analysis date
    pub day_end_level: Option<f64>,
    /// High-intensity stress minutes for the day
    pub high_stress_minutes: Option<f64>,
    /// 7-day window of daily net battery change
    pub net_change_window: Window,
}

/// Structured energy-budget verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyVerdict {
    pub wake_charge_level: Option<f64>,
    pub day_end_level: Option<f64>,
    /// Overnight gain: wake charge minus the overnight starting level
    pub actual_recharge: Option<f64>,
    pub resource_trend: TrendEstimate,
    /// Aggregate high-intensity stress duration, minutes
    pub stress_load_minutes: Option<f64>,
    /// Low recharge combined with high stress load
    pub depleted_recovery: Option<bool>,
    pub morning_readiness: Option<&'static str>,
    pub recharge_quality: Option<&'static str>,
    pub insight: String,
}

/// Classify the energy budget for one day
pub fn classify(inputs: &EnergyInputs, thresholds: &Thresholds) -> EnergyVerdict {
    let actual_recharge = match (inputs.wake_charge_level, inputs.overnight_start_level) {
        (Some(wake), Some(start)) => Some(wake - start),
        _ => None,
    };

    let resource_trend = stats::trend(&inputs.net_change_window, thresholds.stable_slope_band);

    let depleted_recovery = match (actual_recharge, inputs.high_stress_minutes) {
        (Some(recharge), Some(stress)) => Some(
            recharge < thresholds.low_recharge_level && stress > thresholds.high_stress_minutes,
        ),
        _ => None,
    };

    let insight = build_insight(
        inputs.wake_charge_level,
        actual_recharge,
        resource_trend,
        thresholds,
    );

    EnergyVerdict {
        wake_charge_level: inputs.wake_charge_level,
        day_end_level: inputs.day_end_level,
        actual_recharge,
        resource_trend,
        stress_load_minutes: inputs.high_stress_minutes,
        depleted_recovery,
        morning_readiness: inputs.wake_charge_level.map(readiness),
        recharge_quality: actual_recharge.map(recharge_quality),
        insight,
    }
}

fn build_insight(
    wake_charge: Option<f64>,
    actual_recharge: Option<f64>,
    resource_trend: TrendEstimate,
    thresholds: &Thresholds,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(recharge) = actual_recharge {
        if recharge < thresholds.low_recharge_level {
            parts.push(format!(
                "Only recharged {recharge:.0} points overnight - sleep quality may be compromised."
            ));
        } else if recharge >= 60.0 {
            parts.push(format!(
                "Excellent overnight recharge of {recharge:.0} points."
            ));
        }
    }

    if wake_charge.is_some_and(|level| level < thresholds.low_battery_start) {
        parts.push("Starting day with low energy reserves - pace activities accordingly.".to_string());
    }

    match resource_trend.label {
        TrendLabel::Descending => parts.push(
            "Body battery trending downward over past week - accumulating fatigue.".to_string(),
        ),
        TrendLabel::Ascending => parts.push(
            "Body battery improving over past week - recovery protocols working.".to_string(),
        ),
        TrendLabel::Stable => {}
    }

    if parts.is_empty() {
        "Energy levels stable.".to_string()
    } else {
        parts.join(" ")
    }
}

fn readiness(level: f64) -> &'static str {
    if level >= 80.0 {
        "Excellent"
    } else if level >= 60.0 {
        "Good"
    } else if level >= 40.0 {
        "Moderate"
    } else if level >= 20.0 {
        "Low"
    } else {
        "Critical"
    }
}

fn recharge_quality(recharge: f64) -> &'static str {
    if recharge >= 60.0 {
        "Excellent"
    } else if recharge >= 40.0 {
        "Good"
    } else if recharge >= 20.0 {
        "Moderate"
    } else {
        "Poor"
    }
}
