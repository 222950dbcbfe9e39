//! Recommendation synthesizer
//!
//! Aggregates the four classifier verdicts into categorized guidance. Rules
//! run independently per category; within a category the most severe
//! condition wins when advice would conflict. Rest-day guidance (elevated
//! sympathetic drive or depleted recovery) always supersedes a
//! performance-window suggestion. Empty lists are a valid result.

use crate::classifiers::{
    AutonomicBalance, EnergyVerdict, MetabolicVerdict, NervousVerdict, SleepVerdict,
};
use crate::config::Thresholds;
use serde::{Deserialize, Serialize};

/// The four classifier verdicts for one day
#[derive(Debug, Clone)]
pub struct VerdictSet {
    pub nervous: NervousVerdict,
    pub sleep: SleepVerdict,
    pub metabolic: MetabolicVerdict,
    pub energy: EnergyVerdict,
}

/// Categorized guidance lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub training: Vec<String>,
    pub recovery: Vec<String>,
    pub sleep: Vec<String>,
    pub lifestyle: Vec<String>,
}

/// Synthesize recommendations from the day's verdicts.
///
/// `thresholds` carries the phase-weighted bounds; the rule set itself never
/// changes with phase.
pub fn synthesize(verdicts: &VerdictSet, thresholds: &Thresholds) -> Recommendations {
    let mut rec = Recommendations::default();

    training_rules(verdicts, thresholds, &mut rec.training);
    recovery_rules(verdicts, thresholds, &mut rec.recovery);
    sleep_rules(&verdicts.sleep, &mut rec.sleep);
    lifestyle_rules(verdicts, thresholds, &mut rec.lifestyle);

    rec
}

fn training_rules(verdicts: &VerdictSet, thresholds: &Thresholds, out: &mut Vec<String>) {
    let nervous = &verdicts.nervous;
    let energy = &verdicts.energy;

    let rest_required = nervous.sympathetic_drive_elevated == Some(true)
        || nervous.balance == AutonomicBalance::SympatheticDominance
        || energy.depleted_recovery == Some(true);

    if rest_required {
        out.push("Mandatory rest day - nervous system under stress".to_string());
    } else if nervous.balance == AutonomicBalance::PeakPerformanceWindow
        && nervous.hrv_z_score.is_some_and(|z| z > thresholds.hrv_peak_z)
    {
        // The phase-weighted bar decides whether the window is actionable
        out.push("Optimal day for high-intensity or strength training".to_string());
    }

    // Weekly Zone 2 planning operates on a longer horizon and does not
    // conflict with a single rest day.
    if verdicts.metabolic.weekly_goal_progress_pct < 75.0 {
        let shortfall =
            (thresholds.weekly_zone2_goal_min - verdicts.metabolic.weekly_zone2_minutes).ceil();
        out.push(format!(
            "Add {shortfall:.0} more Zone 2 minutes this week"
        ));
    }
}

fn recovery_rules(verdicts: &VerdictSet, thresholds: &Thresholds, out: &mut Vec<String>) {
    if verdicts
        .nervous
        .stress_balance_ratio
        .is_some_and(|r| r > thresholds.high_stress_ratio)
    {
        out.push("Schedule parasympathetic activation (breathing, meditation)".to_string());
    }

    if verdicts.energy.depleted_recovery == Some(true) {
        out.push("Prioritize recovery - low recharge under high stress load".to_string());
    } else if verdicts
        .energy
        .wake_charge_level
        .is_some_and(|level| level < thresholds.low_battery_start)
    {
        out.push("Pace activities - starting the day with depleted reserves".to_string());
    }
}

fn sleep_rules(sleep: &SleepVerdict, out: &mut Vec<String>) {
    // Unknown compliance never generates advice; absence is not failure.
    if sleep.glymphatic_efficiency_met == Some(false) {
        out.push("Optimize for deep sleep: cool room, no alcohol, early dinner".to_string());
    }
    if sleep.cognitive_repair_met == Some(false) {
        out.push("Protect REM: avoid late caffeine, maintain consistent wake time".to_string());
    }
    if sleep.circadian_disruption == Some(true) {
        out.push("Anchor wake time within a 30-minute window for circadian stability".to_string());
    }
}

fn lifestyle_rules(verdicts: &VerdictSet, thresholds: &Thresholds, out: &mut Vec<String>) {
    if verdicts.metabolic.sedentary == Some(true) {
        out.push("Increase NEAT: walking meetings, hourly movement breaks".to_string());
    }

    if verdicts
        .nervous
        .high_stress_minutes
        .is_some_and(|m| m > thresholds.high_stress_minutes)
    {
        out.push("Implement stress interrupts throughout the day".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::{energy, metabolic, nervous, sleep};
    use crate::types::{ProtocolPhase, Sample, Window};
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

    fn verdicts_for(hrv_today: f64, wake_charge: f64, stress_minutes: f64) -> VerdictSet {
        let thresholds = Thresholds::default();
        let nervous = nervous::classify(
            &nervous::NervousInputs {
                hrv_today_ms: Some(hrv_today),
                hrv_window: make_window(&[53.0, 54.0, 55.0, 56.0, 57.0]),
                rhr_today_bpm: Some(53.0),
                rhr_window: make_window(&[52.0, 53.0, 54.0]),
                rhr_trend_window: make_window(&[53.0, 53.0, 53.0]),
                high_stress_minutes: Some(stress_minutes),
                rest_stress_minutes: Some(300.0),
            },
            &thresholds,
        );
        let sleep = sleep::classify(
            &sleep::SleepInputs {
                deep_sleep_pct: Some(18.0),
                rem_sleep_pct: Some(22.0),
                wake_time_minutes: Some(390.0),
                wake_time_window: make_window(&[388.0, 392.0, 390.0]),
            },
            &thresholds,
        );
        let metabolic = metabolic::classify(
            &metabolic::MetabolicInputs {
                moderate_minutes_today: Some(30.0),
                vigorous_minutes_today: Some(10.0),
                moderate_window: make_window(&[30.0, 30.0, 30.0, 30.0, 30.0, 15.0, 15.0]),
                active_minutes_window: make_window(&[40.0, 40.0, 40.0, 40.0, 40.0, 25.0, 25.0]),
                steps_today: Some(9000.0),
                steps_prior_window: make_window(&[8000.0, 8000.0, 8000.0]),
            },
            &thresholds,
        );
        let energy = energy::classify(
            &energy::EnergyInputs {
                wake_charge_level: Some(wake_charge),
                overnight_start_level: Some(wake_charge - 55.0),
                day_end_level: Some(30.0),
                high_stress_minutes: Some(stress_minutes),
                net_change_window: make_window(&[1.0, 0.0, -1.0, 1.0, 0.0, -1.0, 0.0]),
            },
            &thresholds,
        );

        VerdictSet {
            nervous,
            sleep,
            metabolic,
            energy,
        }
    }

    fn contains(list: &[String], needle: &str) -> bool {
        list.iter().any(|s| s.contains(needle))
    }

    #[test]
    fn test_quiet_day_yields_empty_or_minimal_lists() {
        let verdicts = verdicts_for(55.0, 85.0, 20.0);
        let rec = synthesize(&verdicts, &Thresholds::default());
        assert!(rec.training.is_empty());
        assert!(rec.recovery.is_empty());
        assert!(rec.sleep.is_empty());
        assert!(rec.lifestyle.is_empty());
    }

    #[test]
    fn test_peak_window_suggests_intensity() {
        let verdicts = verdicts_for(62.0, 85.0, 20.0);
        let rec = synthesize(&verdicts, &Thresholds::default());
        assert!(contains(&rec.training, "high-intensity"));
    }

    #[test]
    fn test_rest_day_supersedes_peak_window() {
        // Peak HRV but depleted recovery: rest must win
        let mut verdicts = verdicts_for(62.0, 85.0, 20.0);
        verdicts.energy.depleted_recovery = Some(true);
        let rec = synthesize(&verdicts, &Thresholds::default());
        assert!(contains(&rec.training, "rest day"));
        assert!(!contains(&rec.training, "high-intensity"));
    }

    #[test]
    fn test_no_contradictory_training_advice() {
        // Sweep verdict combinations; rest and intensity never co-occur
        for hrv in [40.0, 55.0, 62.0] {
            for charge in [30.0, 85.0] {
                for stress in [20.0, 150.0] {
                    let rec = synthesize(&verdicts_for(hrv, charge, stress), &Thresholds::default());
                    let has_rest = contains(&rec.training, "rest day");
                    let has_intensity = contains(&rec.training, "high-intensity");
                    assert!(!(has_rest && has_intensity));
                }
            }
        }
    }

    #[test]
    fn test_recovery_phase_raises_intensity_bar() {
        // z ≈ 1.58 clears the Maintenance bar but not the Recovery bar
        let verdicts = verdicts_for(57.5, 85.0, 20.0);
        let maintenance = synthesize(&verdicts, &Thresholds::for_phase(ProtocolPhase::Maintenance));
        assert!(contains(&maintenance.training, "high-intensity"));

        let recovery_t = Thresholds::for_phase(ProtocolPhase::Recovery);
        let verdicts = {
            // Re-classify under the phase-weighted thresholds
            let mut v = verdicts_for(57.5, 85.0, 20.0);
            v.nervous = crate::classifiers::nervous::classify(
                &crate::classifiers::nervous::NervousInputs {
                    hrv_today_ms: Some(57.5),
                    hrv_window: make_window(&[53.0, 54.0, 55.0, 56.0, 57.0]),
                    rhr_today_bpm: Some(53.0),
                    rhr_window: make_window(&[52.0, 53.0, 54.0]),
                    rhr_trend_window: make_window(&[53.0, 53.0, 53.0]),
                    high_stress_minutes: Some(20.0),
                    rest_stress_minutes: Some(300.0),
                },
                &recovery_t,
            );
            v
        };
        let recovery = synthesize(&verdicts, &recovery_t);
        assert!(!contains(&recovery.training, "high-intensity"));
    }

    #[test]
    fn test_zone2_shortfall_advice() {
        let verdicts = verdicts_for(55.0, 85.0, 20.0);
        // weekly sum 180 ⇒ no shortfall advice
        let rec = synthesize(&verdicts, &Thresholds::default());
        assert!(!contains(&rec.training, "Zone 2"));

        let mut verdicts = verdicts_for(55.0, 85.0, 20.0);
        verdicts.metabolic.weekly_zone2_minutes = 100.0;
        verdicts.metabolic.weekly_goal_progress_pct = 100.0 / 180.0 * 100.0;
        let rec = synthesize(&verdicts, &Thresholds::default());
        assert!(contains(&rec.training, "Add 80 more Zone 2 minutes"));
    }

    #[test]
    fn test_sleep_rules_skip_unknowns() {
        let mut verdicts = verdicts_for(55.0, 85.0, 20.0);
        verdicts.sleep.glymphatic_efficiency_met = None;
        verdicts.sleep.cognitive_repair_met = None;
        verdicts.sleep.circadian_disruption = None;
        let rec = synthesize(&verdicts, &Thresholds::default());
        assert!(rec.sleep.is_empty());
    }

    #[test]
    fn test_stress_rules() {
        let verdicts = verdicts_for(55.0, 85.0, 250.0);
        let rec = synthesize(&verdicts, &Thresholds::default());
        // 250 / 550 ratio ≈ 0.45 > 0.4 and 250 min > 90 min
        assert!(contains(&rec.recovery, "parasympathetic"));
        assert!(contains(&rec.lifestyle, "stress interrupts"));
    }
}
