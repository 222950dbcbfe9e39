//! Daily bio-context document
//!
//! The hierarchical result handed to the Bio-Context Assembler. Section and
//! field names are part of the external contract; percentages appear both as
//! raw floats and formatted strings.

use crate::classifiers::{EnergyVerdict, MetabolicVerdict, NervousVerdict, SleepVerdict};
use crate::config::Thresholds;
use crate::error::EngineError;
use crate::recommend::Recommendations;
use crate::stats::TrendEstimate;
use crate::types::ProtocolPhase;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Format a signed percentage with one decimal, e.g. "-23.6%" or "+4.2%".
/// Values that round to zero render as "0.0%" with no sign.
pub fn format_signed_pct(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded > 0.0 {
        format!("+{rounded:.1}%")
    } else if rounded < 0.0 {
        format!("{rounded:.1}%")
    } else {
        "0.0%".to_string()
    }
}

/// Format an unsigned percentage rounded to a whole number, e.g. "85%"
pub fn format_whole_pct(value: f64) -> String {
    format!("{value:.0}%")
}

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMeta {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub protocol_phase: ProtocolPhase,
    pub generated_at: DateTime<Utc>,
    /// Unique ID for this analysis run
    pub analysis_id: String,
    pub engine_version: String,
    pub producer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HrvStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_30d_ms: Option<f64>,
    /// Formatted deviation from the 30-day baseline, e.g. "-23.6%"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation_from_baseline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation_raw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_score: Option<f64>,
    pub insufficient_variance: bool,
    pub balance_classification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestingHeartRateStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_bpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_30d_bpm: Option<f64>,
    pub trend: TrendEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sympathetic_drive_elevated: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressLoad {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_stress_duration_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_stress_duration_min: Option<f64>,
    /// High-stress share of tracked time, [0, 1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_balance_ratio: Option<f64>,
}

/// Nervous-system section of the daily context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NervousSystemProfile {
    pub hrv_status: HrvStatus,
    pub resting_heart_rate: RestingHeartRateStatus,
    pub stress_load: StressLoad,
    pub insight: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepStage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_raw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircadianAlignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wake_time_variance_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circadian_disruption: Option<bool>,
    pub circadian_anchor_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolCompliance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glymphatic_efficiency_met: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_repair_met: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_compliance: Option<bool>,
}

/// Sleep section of the daily context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepArchitecture {
    pub deep_sleep: SleepStage,
    pub rem_sleep: SleepStage,
    pub circadian_alignment: CircadianAlignment,
    pub huberman_protocol_compliance: ProtocolCompliance,
    pub insight: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityMinutes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderate_zone2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vigorous: Option<f64>,
    pub weekly_total_zone2: f64,
    pub weekly_goal_minutes: f64,
    /// Progress toward the weekly goal, e.g. "85%"
    pub weekly_goal_progress: String,
    pub weekly_goal_progress_raw: f64,
    pub zone2_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepCadence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_7d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_raw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sedentary_flag: Option<bool>,
}

/// Metabolic section of the daily context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetabolicEngine {
    pub intensity_minutes: IntensityMinutes,
    pub step_cadence: StepCadence,
    pub activity_trend: TrendEstimate,
    pub insight: String,
}

/// Recovery-battery section of the daily context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryBattery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub am_charge_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_end_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_recharge: Option<f64>,
    pub resource_trend: TrendEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_load_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depleted_recovery: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning_readiness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recharge_quality: Option<String>,
    pub insight: String,
}

/// One cross-metric correlation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub coefficient: f64,
    pub strength: String,
    /// Physiologically expected sign, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_direction: Option<String>,
    pub insight: String,
}

/// Cross-metric correlations over the shared history. The next-day pairs
/// relate a day's training load to the following morning's HRV.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossMetricCorrelations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hrv_rhr: Option<CorrelationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hrv_deep_sleep: Option<CorrelationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_body_battery: Option<CorrelationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_duration_stress: Option<CorrelationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone2_next_day_hrv: Option<CorrelationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_next_day_hrv: Option<CorrelationEntry>,
}

/// Per-metric-family availability and the resulting completeness score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQuality {
    pub hrv_available: bool,
    pub rhr_available: bool,
    pub sleep_available: bool,
    pub stress_available: bool,
    pub activity_available: bool,
    /// e.g. "4/5"
    pub completeness_score: String,
    pub completeness_pct: f64,
    /// High / Medium / Low
    pub confidence: String,
}

impl DataQuality {
    pub fn from_flags(
        hrv: bool,
        rhr: bool,
        sleep: bool,
        stress: bool,
        activity: bool,
    ) -> Self {
        let flags = [hrv, rhr, sleep, stress, activity];
        let available = flags.iter().filter(|&&f| f).count();
        let total = flags.len();
        let confidence = if available >= 4 {
            "High"
        } else if available >= 2 {
            "Medium"
        } else {
            "Low"
        };
        Self {
            hrv_available: hrv,
            rhr_available: rhr,
            sleep_available: sleep,
            stress_available: stress,
            activity_available: activity,
            completeness_score: format!("{available}/{total}"),
            completeness_pct: available as f64 / total as f64 * 100.0,
            confidence: confidence.to_string(),
        }
    }
}

/// Complete daily bio-context, consumed verbatim by the assembler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBioContext {
    pub meta: AnalysisMeta,
    pub nervous_system_profile: NervousSystemProfile,
    pub sleep_architecture_deep_dive: SleepArchitecture,
    pub metabolic_engine: MetabolicEngine,
    pub recovery_battery: RecoveryBattery,
    pub cross_metric_correlations: CrossMetricCorrelations,
    pub protocol_recommendations: Recommendations,
    pub data_quality: DataQuality,
}

impl DailyBioContext {
    /// Serialize the context to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(self).map_err(EngineError::JsonError)
    }
}

/// Build the nervous-system section from its verdict
pub(crate) fn nervous_section(verdict: &NervousVerdict) -> NervousSystemProfile {
    NervousSystemProfile {
        hrv_status: HrvStatus {
            today_ms: verdict.hrv_today_ms,
            baseline_30d_ms: verdict.hrv_baseline_30d_ms,
            deviation_from_baseline: verdict.hrv_deviation_pct.map(format_signed_pct),
            deviation_raw: verdict.hrv_deviation_pct,
            z_score: verdict.hrv_z_score,
            insufficient_variance: verdict.insufficient_variance,
            balance_classification: verdict.balance.as_str().to_string(),
            recovery_status: verdict.recovery_status.map(str::to_string),
        },
        resting_heart_rate: RestingHeartRateStatus {
            today_bpm: verdict.rhr_today_bpm,
            lowest_30d_bpm: verdict.rhr_lowest_30d_bpm,
            trend: verdict.rhr_trend,
            sympathetic_drive_elevated: verdict.sympathetic_drive_elevated,
        },
        stress_load: StressLoad {
            high_stress_duration_min: verdict.high_stress_minutes,
            rest_stress_duration_min: verdict.rest_stress_minutes,
            stress_balance_ratio: verdict.stress_balance_ratio,
        },
        insight: verdict.insight.clone(),
    }
}

/// Build the sleep section from its verdict
pub(crate) fn sleep_section(verdict: &SleepVerdict) -> SleepArchitecture {
    let stage = |pct: Option<f64>, status: Option<crate::classifiers::StageStatus>| SleepStage {
        percentage: pct.map(|p| format!("{p:.1}%")),
        percentage_raw: pct,
        status: status.map(|s| s.as_str().to_string()),
    };

    let anchor_status = match verdict.circadian_disruption {
        Some(true) => "Disrupted",
        Some(false) => "Stable",
        None => "Unknown",
    };

    SleepArchitecture {
        deep_sleep: stage(verdict.deep_sleep_pct, verdict.deep_sleep_status),
        rem_sleep: stage(verdict.rem_sleep_pct, verdict.rem_sleep_status),
        circadian_alignment: CircadianAlignment {
            wake_time_variance_min: verdict.wake_time_variance_min,
            circadian_disruption: verdict.circadian_disruption,
            circadian_anchor_status: anchor_status.to_string(),
        },
        huberman_protocol_compliance: ProtocolCompliance {
            glymphatic_efficiency_met: verdict.glymphatic_efficiency_met,
            cognitive_repair_met: verdict.cognitive_repair_met,
            overall_compliance: verdict.overall_compliance,
        },
        insight: verdict.insight.clone(),
    }
}

/// Build the metabolic section from its verdict
pub(crate) fn metabolic_section(
    verdict: &MetabolicVerdict,
    thresholds: &Thresholds,
) -> MetabolicEngine {
    MetabolicEngine {
        intensity_minutes: IntensityMinutes {
            moderate_zone2: verdict.moderate_minutes_today,
            vigorous: verdict.vigorous_minutes_today,
            weekly_total_zone2: verdict.weekly_zone2_minutes,
            weekly_goal_minutes: thresholds.weekly_zone2_goal_min,
            weekly_goal_progress: format_whole_pct(verdict.weekly_goal_progress_pct),
            weekly_goal_progress_raw: verdict.weekly_goal_progress_pct,
            zone2_status: verdict.zone2_status.to_string(),
        },
        step_cadence: StepCadence {
            total_steps: verdict.steps_today,
            baseline_7d: verdict.steps_baseline,
            delta: verdict.steps_delta_pct.map(format_signed_pct),
            delta_raw: verdict.steps_delta_pct,
            sedentary_flag: verdict.sedentary,
        },
        activity_trend: verdict.activity_trend,
        insight: verdict.insight.clone(),
    }
}

/// Build the recovery-battery section from its verdict
pub(crate) fn battery_section(verdict: &EnergyVerdict) -> RecoveryBattery {
    RecoveryBattery {
        am_charge_level: verdict.wake_charge_level,
        day_end_level: verdict.day_end_level,
        actual_recharge: verdict.actual_recharge,
        resource_trend: verdict.resource_trend,
        stress_load_minutes: verdict.stress_load_minutes,
        depleted_recovery: verdict.depleted_recovery,
        morning_readiness: verdict.morning_readiness.map(str::to_string),
        recharge_quality: verdict.recharge_quality.map(str::to_string),
        insight: verdict.insight.clone(),
    }
}
