//! Data model: factors, scored responses, calibration records and
//! statistics, escalation tiers and decisions.

pub mod calibration;
pub mod escalation;
pub mod factor;
pub mod response;

pub use calibration::{
    CalibrationObservation, CalibrationRecord, CalibrationStatistics, ConfidenceBin,
    ScopedObservations,
};
pub use escalation::{DecisionStatus, EscalationDecision, EscalationTier};
pub use factor::{FactorCategory, UncertaintyFactor};
pub use response::{ConfidenceLevel, ConfidenceResponse};
