//! # candor-core
//!
//! Foundation crate for the Candor confidence calibration engine.
//! Defines the data model, traits, errors, config, constants, and the
//! calibration statistics aggregation shared by every store.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod stats;
pub mod traits;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::CandorConfig;
pub use errors::{CandorError, CandorResult};
pub use models::{
    CalibrationObservation, CalibrationRecord, CalibrationStatistics, ConfidenceLevel,
    ConfidenceResponse, DecisionStatus, EscalationDecision, EscalationTier, FactorCategory,
    UncertaintyFactor,
};
pub use traits::{ICalibrationStore, IFactorExtractor};
