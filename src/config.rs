//! Threshold configuration
//!
//! Every protocol constant lives here as a named value so the protocol phase
//! can weight them without touching classifier logic. Defaults correspond to
//! the Maintenance phase.

use crate::types::ProtocolPhase;
use serde::{Deserialize, Serialize};

/// Named thresholds used by the classifiers and the recommendation
/// synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// Deep sleep target as percent of total sleep (Huberman protocol)
    pub deep_sleep_target_pct: f64,
    /// REM sleep target as percent of total sleep (Huberman protocol)
    pub rem_sleep_target_pct: f64,
    /// Wake-time deviation beyond which circadian disruption is flagged (minutes)
    pub wake_variance_threshold_min: f64,
    /// RHR elevation over the 30-day low that flags sympathetic drive (bpm)
    pub rhr_elevation_threshold_bpm: f64,
    /// Weekly Zone 2 goal (Attia protocol, minutes)
    pub weekly_zone2_goal_min: f64,
    /// Total active minutes below which a day counts as low-activity
    pub low_activity_minutes: f64,
    /// HRV z-score below which the autonomic balance is sympathetic-dominant
    pub hrv_unbalanced_z: f64,
    /// HRV z-score above which a peak performance window opens
    pub hrv_peak_z: f64,
    /// HRV deviation from baseline (percent) bounding the Optimal recovery band
    pub recovery_deviation_pct: f64,
    /// Overnight recharge below which recovery is considered compromised
    pub low_recharge_level: f64,
    /// Wake-time body battery level below which reserves are depleted
    pub low_battery_start: f64,
    /// Stress balance ratio above which parasympathetic work is recommended
    pub high_stress_ratio: f64,
    /// High-stress minutes above which stress interrupts are recommended
    pub high_stress_minutes: f64,
    /// Tolerance band for labeling a trend slope as stable (native units/day)
    pub stable_slope_band: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            deep_sleep_target_pct: 15.0,
            rem_sleep_target_pct: 20.0,
            wake_variance_threshold_min: 30.0,
            rhr_elevation_threshold_bpm: 3.0,
            weekly_zone2_goal_min: 180.0,
            low_activity_minutes: 30.0,
            hrv_unbalanced_z: -1.5,
            hrv_peak_z: 1.5,
            recovery_deviation_pct: 10.0,
            low_recharge_level: 30.0,
            low_battery_start: 50.0,
            high_stress_ratio: 0.4,
            high_stress_minutes: 90.0,
            stable_slope_band: crate::stats::DEFAULT_STABLE_SLOPE,
        }
    }
}

impl Thresholds {
    /// Thresholds weighted for the given protocol phase.
    ///
    /// Phase tuning only moves bounds; it never adds or removes rule types.
    pub fn for_phase(phase: ProtocolPhase) -> Self {
        let mut t = Self::default();
        match phase {
            ProtocolPhase::Maintenance => {}
            ProtocolPhase::Recovery => {
                // Raise the bar for an "optimal training day" call and demand
                // deeper overnight recharge before clearing intensity.
                t.hrv_peak_z = 2.0;
                t.low_recharge_level = 40.0;
                t.high_stress_ratio = 0.3;
            }
            ProtocolPhase::Performance => {
                t.hrv_peak_z = 1.2;
            }
            ProtocolPhase::Deload => {
                t.low_activity_minutes = 20.0;
                t.hrv_peak_z = 2.0;
            }
        }
        t
    }
}
