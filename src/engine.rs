//! Engine orchestration
//!
//! `BiomarkerEngine` is the public entry point: it materializes windows from
//! the time-series store, runs the statistics kernel and the four
//! classifiers, synthesizes recommendations, and assembles the daily
//! bio-context. The engine holds no mutable state; every invocation is an
//! independent, pure computation over the store's history, so multiple days
//! can be analyzed in parallel.

use crate::classifiers::{energy, metabolic, nervous, sleep};
use crate::config::Thresholds;
use crate::context::{
    battery_section, metabolic_section, nervous_section, sleep_section, AnalysisMeta,
    CorrelationEntry, CrossMetricCorrelations, DailyBioContext, DataQuality,
};
use crate::error::EngineError;
use crate::recommend::{self, VerdictSet};
use crate::stats;
use crate::store::TimeSeriesStore;
use crate::types::{Metric, ProtocolPhase, Sample, Window};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Baseline windows span 30 days
pub const BASELINE_WINDOW_DAYS: u32 = 30;

/// Rolling-sum and trend windows span 7 days
pub const TREND_WINDOW_DAYS: u32 = 7;

/// Stateless analysis engine over a read-only time-series store
pub struct BiomarkerEngine<S: TimeSeriesStore> {
    store: S,
}

impl<S: TimeSeriesStore> BiomarkerEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Analyze one day, parsing the date from "YYYY-MM-DD"
    pub fn analyze_str(
        &self,
        date: &str,
        phase: ProtocolPhase,
    ) -> Result<DailyBioContext, EngineError> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| EngineError::InvalidDate(date.to_string()))?;
        self.analyze(date, phase)
    }

    /// Produce the complete daily bio-context for `date`.
    ///
    /// Baseline windows end the day before `date` so a reading never dilutes
    /// its own baseline; rolling sums (weekly Zone 2) include `date`.
    /// Partial data degrades to unknown fields and a lower completeness
    /// score; only invalid store data (negative durations) is an error.
    pub fn analyze(
        &self,
        date: NaiveDate,
        phase: ProtocolPhase,
    ) -> Result<DailyBioContext, EngineError> {
        let thresholds = Thresholds::for_phase(phase);
        let prior_end = date - Duration::days(1);

        // Nervous system
        let hrv_today = self.store.get_sample(Metric::Hrv, date);
        let hrv_window = self
            .store
            .get_window(Metric::Hrv, prior_end, BASELINE_WINDOW_DAYS);
        let rhr_today = self.store.get_sample(Metric::RestingHeartRate, date);
        let rhr_window =
            self.store
                .get_window(Metric::RestingHeartRate, prior_end, BASELINE_WINDOW_DAYS);
        let high_stress = non_negative(
            "high_stress_minutes",
            self.store.get_sample(Metric::HighStressMinutes, date),
        )?;
        let rest_stress = non_negative(
            "rest_stress_minutes",
            self.store.get_sample(Metric::RestStressMinutes, date),
        )?;
        let nervous_verdict = nervous::classify(
            &nervous::NervousInputs {
                hrv_today_ms: hrv_today,
                hrv_window: hrv_window.clone(),
                rhr_today_bpm: rhr_today,
                rhr_window,
                rhr_trend_window: self.store.get_window(
                    Metric::RestingHeartRate,
                    date,
                    TREND_WINDOW_DAYS,
                ),
                high_stress_minutes: high_stress,
                rest_stress_minutes: rest_stress,
            },
            &thresholds,
        );

        // Sleep
        let deep_pct = self.store.get_sample(Metric::DeepSleepPct, date);
        let rem_pct = self.store.get_sample(Metric::RemSleepPct, date);
        let sleep_verdict = sleep::classify(
            &sleep::SleepInputs {
                deep_sleep_pct: deep_pct,
                rem_sleep_pct: rem_pct,
                wake_time_minutes: self.store.get_sample(Metric::WakeTimeMinutes, date),
                wake_time_window: self.store.get_window(
                    Metric::WakeTimeMinutes,
                    prior_end,
                    TREND_WINDOW_DAYS,
                ),
            },
            &thresholds,
        );

        // Metabolic
        let moderate_today = non_negative(
            "moderate_intensity_minutes",
            self.store
                .get_sample(Metric::ModerateIntensityMinutes, date),
        )?;
        let vigorous_today = non_negative(
            "vigorous_intensity_minutes",
            self.store
                .get_sample(Metric::VigorousIntensityMinutes, date),
        )?;
        let moderate_window =
            self.store
                .get_window(Metric::ModerateIntensityMinutes, date, TREND_WINDOW_DAYS);
        let vigorous_window =
            self.store
                .get_window(Metric::VigorousIntensityMinutes, date, TREND_WINDOW_DAYS);
        let steps_today = self.store.get_sample(Metric::Steps, date);
        let metabolic_verdict = metabolic::classify(
            &metabolic::MetabolicInputs {
                moderate_minutes_today: moderate_today,
                vigorous_minutes_today: vigorous_today,
                moderate_window: moderate_window.clone(),
                active_minutes_window: sum_by_date(&moderate_window, &vigorous_window),
                steps_today,
                steps_prior_window: self.store.get_window(
                    Metric::Steps,
                    prior_end,
                    TREND_WINDOW_DAYS,
                ),
            },
            &thresholds,
        );

        // Energy budget
        let wake_charge = self.store.get_sample(Metric::BodyBatteryWakeLevel, date);
        let energy_verdict = energy::classify(
            &energy::EnergyInputs {
                wake_charge_level: wake_charge,
                overnight_start_level: self.store.get_sample(Metric::BodyBatteryFloor, prior_end),
                day_end_level: self.store.get_sample(Metric::BodyBatteryFloor, date),
                high_stress_minutes: high_stress,
                net_change_window: self.store.get_window(
                    Metric::BodyBatteryNetChange,
                    date,
                    TREND_WINDOW_DAYS,
                ),
            },
            &thresholds,
        );

        let verdicts = VerdictSet {
            nervous: nervous_verdict,
            sleep: sleep_verdict,
            metabolic: metabolic_verdict,
            energy: energy_verdict,
        };
        let recommendations = recommend::synthesize(&verdicts, &thresholds);

        let correlations = self.correlations(date);

        let data_quality = DataQuality::from_flags(
            hrv_today.is_some() || !hrv_window.is_empty(),
            rhr_today.is_some() || verdicts.nervous.rhr_lowest_30d_bpm.is_some(),
            deep_pct.is_some() || rem_pct.is_some(),
            high_stress.is_some() || wake_charge.is_some(),
            steps_today.is_some() || moderate_today.is_some(),
        );

        Ok(DailyBioContext {
            meta: AnalysisMeta {
                date,
                day_of_week: date.weekday().to_string(),
                protocol_phase: phase,
                generated_at: Utc::now(),
                analysis_id: Uuid::new_v4().to_string(),
                engine_version: crate::ENGINE_VERSION.to_string(),
                producer: crate::PRODUCER_NAME.to_string(),
            },
            nervous_system_profile: nervous_section(&verdicts.nervous),
            sleep_architecture_deep_dive: sleep_section(&verdicts.sleep),
            metabolic_engine: metabolic_section(&verdicts.metabolic, &thresholds),
            recovery_battery: battery_section(&verdicts.energy),
            cross_metric_correlations: correlations,
            protocol_recommendations: recommendations,
            data_quality,
        })
    }

    /// Pearson correlations over the shared 30-day history.
    ///
    /// The next-day pairs shift HRV back one day so a day's training load is
    /// related to the following morning's reading.
    fn correlations(&self, date: NaiveDate) -> CrossMetricCorrelations {
        let win = |metric| self.store.get_window(metric, date, BASELINE_WINDOW_DAYS);
        let hrv = win(Metric::Hrv);

        CrossMetricCorrelations {
            hrv_rhr: correlation_entry(
                &hrv,
                &win(Metric::RestingHeartRate),
                0,
                "HRV",
                "RHR",
                true,
            ),
            hrv_deep_sleep: correlation_entry(
                &hrv,
                &win(Metric::DeepSleepPct),
                0,
                "HRV",
                "deep sleep",
                false,
            ),
            sleep_body_battery: correlation_entry(
                &win(Metric::SleepScore),
                &win(Metric::BodyBatteryWakeLevel),
                0,
                "sleep quality",
                "morning energy",
                false,
            ),
            sleep_duration_stress: correlation_entry(
                &win(Metric::SleepDurationMinutes),
                &win(Metric::AvgStressLevel),
                0,
                "sleep duration",
                "stress",
                true,
            ),
            zone2_next_day_hrv: correlation_entry(
                &win(Metric::ModerateIntensityMinutes),
                &hrv,
                1,
                "Zone 2 training",
                "next-day HRV",
                false,
            ),
            steps_next_day_hrv: correlation_entry(
                &win(Metric::Steps),
                &hrv,
                1,
                "daily steps",
                "next-day HRV",
                false,
            ),
        }
    }
}

fn correlation_entry(
    a: &Window,
    b: &Window,
    shift_days: i64,
    metric_a: &str,
    metric_b: &str,
    expected_negative: bool,
) -> Option<CorrelationEntry> {
    let (xs, ys) = paired_values(a, b, shift_days);
    stats::pearson(&xs, &ys).map(|coefficient| CorrelationEntry {
        coefficient,
        strength: stats::correlation_strength(coefficient).to_string(),
        expected_direction: expected_negative.then(|| "negative".to_string()),
        insight: correlation_insight(metric_a, metric_b, coefficient, expected_negative),
    })
}

fn correlation_insight(
    metric_a: &str,
    metric_b: &str,
    coefficient: f64,
    expected_negative: bool,
) -> String {
    let strength = stats::correlation_strength(coefficient);
    if strength == "negligible" {
        return format!(
            "No significant relationship between {metric_a} and {metric_b} in your data."
        );
    }

    let relationship = if coefficient > 0.0 {
        "increases with"
    } else {
        "decreases with"
    };
    let direction = if coefficient > 0.0 { "positive" } else { "negative" };

    let health_note = if expected_negative {
        if coefficient < -0.2 {
            " (healthy pattern)"
        } else if coefficient > 0.2 {
            " (unexpected - may indicate dysregulation)"
        } else {
            ""
        }
    } else {
        ""
    };

    format!(
        "Your {metric_a} {relationship} {metric_b} ({strength} {direction} correlation: {coefficient:.2}){health_note}"
    )
}

/// Values of `a` paired with values of `b` observed `shift_days` later,
/// restricted to dates where both exist, in date order. A shift of 0 is a
/// plain same-day join.
fn paired_values(a: &Window, b: &Window, shift_days: i64) -> (Vec<f64>, Vec<f64>) {
    let lookup: BTreeMap<NaiveDate, f64> =
        b.samples().iter().map(|s| (s.date, s.value)).collect();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for sample in a.samples() {
        if let Some(&v) = lookup.get(&(sample.date + Duration::days(shift_days))) {
            xs.push(sample.value);
            ys.push(v);
        }
    }
    (xs, ys)
}

/// Per-date sum of two windows (a date present in only one side keeps its
/// single value)
fn sum_by_date(a: &Window, b: &Window) -> Window {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for sample in a.samples().iter().chain(b.samples()) {
        *totals.entry(sample.date).or_insert(0.0) += sample.value;
    }
    let samples: Vec<Sample> = totals
        .into_iter()
        .map(|(date, value)| Sample::new(date, value))
        .collect();
    // BTreeMap keys are unique and ordered, so the invariant holds
    Window::new(samples).unwrap_or_else(|_| Window::empty())
}

fn non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, EngineError> {
    match value {
        Some(v) if v < 0.0 => Err(EngineError::NegativeDuration { field, value: v }),
        other => Ok(other),
    }
}
