//! Expert metric classifiers
//!
//! Four independent filters, each a pure function from today's readings plus
//! historical windows to a structured verdict. A day with partial data still
//! produces a best-effort verdict; unknown is expressed as `None`, never as a
//! false negative.

pub mod energy;
pub mod metabolic;
pub mod nervous;
pub mod sleep;

pub use energy::{EnergyInputs, EnergyVerdict};
pub use metabolic::{MetabolicInputs, MetabolicVerdict};
pub use nervous::{AutonomicBalance, NervousInputs, NervousVerdict};
pub use sleep::{SleepInputs, SleepVerdict, StageStatus};
