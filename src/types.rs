//! Core types for the biomarker engine
//!
//! This module defines the data that flows through the analysis: daily
//! samples, historical windows, the metrics the time-series store serves,
//! and the externally supplied protocol phase.

use crate::error::EngineError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily observation for one metric. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Calendar date the value was observed for
    pub date: NaiveDate,
    /// Value in the metric's native unit (ms, bpm, minutes, ...)
    pub value: f64,
}

impl Sample {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// An ordered sequence of samples spanning consecutive days.
///
/// Invariant: samples are date-sorted ascending with no duplicate dates.
/// A window may be empty; every statistic over it signals absence instead of
/// producing a spurious number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Window {
    samples: Vec<Sample>,
}

impl Window {
    /// Build a window from samples, sorting by date.
    ///
    /// Duplicate dates violate the window invariant and are rejected.
    pub fn new(mut samples: Vec<Sample>) -> Result<Self, EngineError> {
        samples.sort_by_key(|s| s.date);
        for pair in samples.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(EngineError::MalformedWindow(format!(
                    "duplicate sample for {}",
                    pair[0].date
                )));
            }
        }
        Ok(Self { samples })
    }

    /// An empty window (no history available)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Values in date order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Sum of all values (0.0 for an empty window)
    pub fn sum(&self) -> f64 {
        self.values().sum()
    }

    /// Minimum value in the window, if any
    pub fn min_value(&self) -> Option<f64> {
        self.values().fold(None, |acc, v| match acc {
            Some(m) if m <= v => Some(m),
            _ => Some(v),
        })
    }
}

/// Scalar daily series the time-series store serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Heart rate variability, rMSSD (ms)
    Hrv,
    /// Resting heart rate (bpm)
    RestingHeartRate,
    /// Deep sleep share of total sleep (percent)
    DeepSleepPct,
    /// REM sleep share of total sleep (percent)
    RemSleepPct,
    /// Wake time as minutes after midnight
    WakeTimeMinutes,
    /// Vendor sleep quality score (0-100)
    SleepScore,
    /// Total sleep duration (minutes)
    SleepDurationMinutes,
    /// Average stress level over the day (0-100)
    AvgStressLevel,
    /// Minutes of high stress during the day
    HighStressMinutes,
    /// Minutes of rest-level stress during the day
    RestStressMinutes,
    /// Moderate (Zone 2) intensity minutes
    ModerateIntensityMinutes,
    /// Vigorous intensity minutes
    VigorousIntensityMinutes,
    /// Daily step count
    Steps,
    /// Body battery level at wake
    BodyBatteryWakeLevel,
    /// Body battery floor (day-end / minimum) level
    BodyBatteryFloor,
    /// Net body battery change over a day
    BodyBatteryNetChange,
}

/// Externally declared training-cycle context.
///
/// The phase weights classifier thresholds; it never changes the algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProtocolPhase {
    #[default]
    Maintenance,
    Recovery,
    Performance,
    Deload,
}

impl ProtocolPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolPhase::Maintenance => "Maintenance",
            ProtocolPhase::Recovery => "Recovery",
            ProtocolPhase::Performance => "Performance",
            ProtocolPhase::Deload => "Deload",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_window_sorts_samples() {
        let window = Window::new(vec![
            Sample::new(d(3), 3.0),
            Sample::new(d(1), 1.0),
            Sample::new(d(2), 2.0),
        ])
        .unwrap();

        let values: Vec<f64> = window.values().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_window_rejects_duplicate_dates() {
        let result = Window::new(vec![Sample::new(d(1), 1.0), Sample::new(d(1), 2.0)]);
        assert!(matches!(result, Err(EngineError::MalformedWindow(_))));
    }

    #[test]
    fn test_empty_window_statistics() {
        let window = Window::empty();
        assert!(window.is_empty());
        assert_eq!(window.sum(), 0.0);
        assert!(window.min_value().is_none());
    }

    #[test]
    fn test_min_value() {
        let window = Window::new(vec![
            Sample::new(d(1), 55.0),
            Sample::new(d(2), 52.0),
            Sample::new(d(3), 58.0),
        ])
        .unwrap();
        assert_eq!(window.min_value(), Some(52.0));
    }
}
