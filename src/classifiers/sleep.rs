//! Sleep classifier (Huberman protocol)
//!
//! Checks deep and REM sleep shares against the protocol targets and flags
//! circadian disruption from wake-time drift. Absence of stage data yields
//! unknown verdicts, never non-compliance.

use crate::config::Thresholds;
use crate::stats;
use crate::types::Window;
use serde::{Deserialize, Serialize};

/// Per-stage status against the protocol target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageStatus {
    Optimal,
    BelowOptimal,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Optimal => "Optimal",
            StageStatus::BelowOptimal => "Below Optimal",
        }
    }
}

/// Today's sleep-stage shares plus the recent wake-time history
#[derive(Debug, Clone)]
pub struct SleepInputs {
    pub deep_sleep_pct: Option<f64>,
    pub rem_sleep_pct: Option<f64>,
    /// Today's wake time, minutes after midnight
    pub wake_time_minutes: Option<f64>,
    /// Prior wake times (ends the day before the analysis date)
    pub wake_time_window: Window,
}

/// Structured sleep verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepVerdict {
    pub deep_sleep_pct: Option<f64>,
    pub deep_sleep_status: Option<StageStatus>,
    pub rem_sleep_pct: Option<f64>,
    pub rem_sleep_status: Option<StageStatus>,
    /// Deep sleep strictly above the target share
    pub glymphatic_efficiency_met: Option<bool>,
    /// REM sleep strictly above the target share
    pub cognitive_repair_met: Option<bool>,
    /// Both stage criteria met; unknown if either side is unknown
    pub overall_compliance: Option<bool>,
    /// Today's wake time drift from the recent mean, minutes
    pub wake_time_variance_min: Option<f64>,
    pub circadian_disruption: Option<bool>,
    pub insight: String,
}

/// Classify sleep architecture for one day
pub fn classify(inputs: &SleepInputs, thresholds: &Thresholds) -> SleepVerdict {
    // Targets are strict: landing exactly on the threshold is not compliant.
    let glymphatic = inputs
        .deep_sleep_pct
        .map(|pct| pct > thresholds.deep_sleep_target_pct);
    let cognitive = inputs
        .rem_sleep_pct
        .map(|pct| pct > thresholds.rem_sleep_target_pct);

    let overall = match (glymphatic, cognitive) {
        (Some(g), Some(c)) => Some(g && c),
        _ => None,
    };

    let deep_status = glymphatic.map(|met| {
        if met {
            StageStatus::Optimal
        } else {
            StageStatus::BelowOptimal
        }
    });
    let rem_status = cognitive.map(|met| {
        if met {
            StageStatus::Optimal
        } else {
            StageStatus::BelowOptimal
        }
    });

    // Disruption is today's wake time drifting from the recent mean; a single
    // prior wake time is not enough of an anchor.
    let wake_variance = match (inputs.wake_time_minutes, stats::baseline(&inputs.wake_time_window))
    {
        (Some(today), Some(mean)) if inputs.wake_time_window.len() >= 2 => {
            Some((today - mean).abs())
        }
        _ => None,
    };
    let disruption = wake_variance.map(|v| v > thresholds.wake_variance_threshold_min);

    let mut parts: Vec<String> = Vec::new();
    if glymphatic == Some(false) {
        if let Some(pct) = inputs.deep_sleep_pct {
            parts.push(format!(
                "Deep sleep at {pct:.1}% is below the {:.0}% target for optimal brain detox.",
                thresholds.deep_sleep_target_pct
            ));
        }
    }
    if cognitive == Some(false) {
        if let Some(pct) = inputs.rem_sleep_pct {
            parts.push(format!(
                "REM sleep at {pct:.1}% is below the {:.0}% target for memory consolidation.",
                thresholds.rem_sleep_target_pct
            ));
        }
    }
    if disruption == Some(true) {
        if let Some(variance) = wake_variance {
            parts.push(format!(
                "Wake time variance of {variance:.0} mins exceeds the {:.0}-min threshold - circadian rhythm may be disrupted.",
                thresholds.wake_variance_threshold_min
            ));
        }
    }
    let insight = if parts.is_empty() {
        "Sleep architecture is optimal for recovery.".to_string()
    } else {
        parts.join(" ")
    };

    SleepVerdict {
        deep_sleep_pct: inputs.deep_sleep_pct,
        deep_sleep_status: deep_status,
        rem_sleep_pct: inputs.rem_sleep_pct,
        rem_sleep_status: rem_status,
        glymphatic_efficiency_met: glymphatic,
        cognitive_repair_met: cognitive,
        overall_compliance: overall,
        wake_time_variance_min: wake_variance,
        circadian_disruption: disruption,
        insight,
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

    fn base_inputs() -> SleepInputs {
        SleepInputs {
            deep_sleep_pct: Some(17.5),
            rem_sleep_pct: Some(22.0),
            wake_time_minutes: Some(6.0 * 60.0 + 30.0),
            wake_time_window: make_window(&[385.0, 390.0, 395.0, 390.0, 385.0, 390.0, 395.0]),
        }
    }

    #[test]
    fn test_compliant_night() {
        let verdict = classify(&base_inputs(), &Thresholds::default());
        assert_eq!(verdict.glymphatic_efficiency_met, Some(true));
        assert_eq!(verdict.cognitive_repair_met, Some(true));
        assert_eq!(verdict.overall_compliance, Some(true));
        assert_eq!(verdict.deep_sleep_status, Some(StageStatus::Optimal));
    }

    #[test]
    fn test_deep_target_boundary_is_not_met() {
        let mut inputs = base_inputs();
        inputs.deep_sleep_pct = Some(15.0);
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.glymphatic_efficiency_met, Some(false));
        assert_eq!(verdict.overall_compliance, Some(false));
        assert_eq!(verdict.deep_sleep_status, Some(StageStatus::BelowOptimal));
    }

    #[test]
    fn test_missing_stage_data_is_unknown() {
        let inputs = SleepInputs {
            deep_sleep_pct: None,
            rem_sleep_pct: None,
            wake_time_minutes: None,
            wake_time_window: Window::empty(),
        };
        let verdict = classify(&inputs, &Thresholds::default());
        assert!(verdict.glymphatic_efficiency_met.is_none());
        assert!(verdict.cognitive_repair_met.is_none());
        assert!(verdict.overall_compliance.is_none());
        assert!(verdict.circadian_disruption.is_none());
    }

    #[test]
    fn test_partial_stage_data_keeps_overall_unknown() {
        let mut inputs = base_inputs();
        inputs.rem_sleep_pct = None;
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.glymphatic_efficiency_met, Some(true));
        assert!(verdict.cognitive_repair_met.is_none());
        assert!(verdict.overall_compliance.is_none());
    }

    #[test]
    fn test_circadian_disruption_flag() {
        let mut inputs = base_inputs();
        // Recent mean ≈ 390; waking at 08:00 (480) drifts 90 minutes
        inputs.wake_time_minutes = Some(480.0);
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.circadian_disruption, Some(true));
        assert!(verdict.wake_time_variance_min.unwrap() > 30.0);

        // 390 is on the mean: stable
        inputs.wake_time_minutes = Some(390.0);
        let verdict = classify(&inputs, &Thresholds::default());
        assert_eq!(verdict.circadian_disruption, Some(false));
    }

    #[test]
    fn test_insight_names_missed_targets() {
        let mut inputs = base_inputs();
        inputs.deep_sleep_pct = Some(10.4);
        let verdict = classify(&inputs, &Thresholds::default());
        assert!(verdict
            .insight
            .contains("Deep sleep at 10.4% is below the 15% target"));

        let verdict = classify(&base_inputs(), &Thresholds::default());
        assert_eq!(verdict.insight, "Sleep architecture is optimal for recovery.");
    }

    #[test]
    fn test_single_prior_wake_time_is_unknown() {
        let mut inputs = base_inputs();
        inputs.wake_time_window = make_window(&[390.0]);
        let verdict = classify(&inputs, &Thresholds::default());
        assert!(verdict.circadian_disruption.is_none());
    }
}
