//! Biotwin Engine - Biomarker analysis over daily wearable time series
//!
//! The engine turns raw daily biomarker series into a structured bio-context
//! through a deterministic pipeline: window materialization → statistics
//! kernel → domain classifiers → recommendation synthesis → context assembly.
//!
//! ## Modules
//!
//! - **Statistics Kernel**: Baselines, z-scores, trends, and guarded ratios
//! - **Classifiers**: Nervous-system, sleep, metabolic, and energy-budget verdicts
//! - **Recommendation Synthesizer**: Categorized guidance from the day's verdicts
//! - **Time-Series Store**: Read-only boundary the engine pulls history through

pub mod classifiers;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod recommend;
pub mod stats;
pub mod store;
pub mod types;

pub use context::{DailyBioContext, DataQuality};
pub use engine::{BiomarkerEngine, BASELINE_WINDOW_DAYS, TREND_WINDOW_DAYS};
pub use error::EngineError;

// Store boundary exports
pub use store::{MemoryStore, TimeSeriesStore};

// Configuration exports
pub use config::Thresholds;
pub use recommend::Recommendations;
pub use types::{Metric, ProtocolPhase, Sample, Window};

/// Engine version embedded in produced contexts
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for generated bio-contexts
pub const PRODUCER_NAME: &str = "biotwin-engine";
