//! Time-series store boundary
//!
//! The engine reads already-materialized daily samples through this trait.
//! Stores are read-only collaborators: the engine never writes, and
//! implementations must tolerate concurrent reads. Short history returns
//! fewer samples; a store never pads with fabricated values.

use crate::types::{Metric, Sample, Window};
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Read-only access to ordered daily samples for each metric
pub trait TimeSeriesStore {
    /// Up to `days` samples for `metric` ending at `end_date` inclusive.
    ///
    /// Days without a recorded sample are simply absent from the window.
    fn get_window(&self, metric: Metric, end_date: NaiveDate, days: u32) -> Window;

    /// The sample recorded for `metric` on `date`, if any
    fn get_sample(&self, metric: Metric, date: NaiveDate) -> Option<f64>;
}

/// In-memory store backing tests and offline analysis runs.
///
/// Per-metric samples are keyed by date, which enforces the window invariant
/// (ascending order, no duplicates) by construction.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    series: HashMap<Metric, BTreeMap<NaiveDate, f64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample, replacing any previous value for that date
    pub fn insert(&mut self, metric: Metric, date: NaiveDate, value: f64) {
        self.series.entry(metric).or_default().insert(date, value);
    }

    /// Record consecutive daily values starting at `start`
    pub fn insert_series(&mut self, metric: Metric, start: NaiveDate, values: &[f64]) {
        for (i, &value) in values.iter().enumerate() {
            self.insert(metric, start + Duration::days(i as i64), value);
        }
    }
}

impl TimeSeriesStore for MemoryStore {
    fn get_window(&self, metric: Metric, end_date: NaiveDate, days: u32) -> Window {
        let Some(series) = self.series.get(&metric) else {
            return Window::empty();
        };
        let start = end_date - Duration::days(i64::from(days) - 1);
        let samples: Vec<Sample> = series
            .range(start..=end_date)
            .map(|(&date, &value)| Sample::new(date, value))
            .collect();
        // BTreeMap iteration is ordered and duplicate-free, so this cannot fail
        Window::new(samples).unwrap_or_else(|_| Window::empty())
    }

    fn get_sample(&self, metric: Metric, date: NaiveDate) -> Option<f64> {
        self.series.get(&metric)?.get(&date).copied()
    }
}
