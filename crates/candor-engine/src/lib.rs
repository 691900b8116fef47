//! # candor-engine
//!
//! Turns a claim into a calibrated confidence and an escalation decision.
//!
//! - [`ConfidenceScorer`]: text heuristics + contextual signals, scaled by the
//!   calibration history of the `(agent, domain)` scope.
//! - [`EscalationGate`]: maps a final score and declared risks onto a tier and
//!   keeps the audit ledger of decisions.
//! - [`CalibrationEngine`]: owns a store, a scorer and a gate, and closes the
//!   loop from verified outcomes back into calibration history.

pub mod engine;
pub mod gate;
pub mod scorer;

pub use engine::{CalibrationEngine, Evaluation};
pub use gate::EscalationGate;
pub use scorer::extractors::{is_idk_response, HeuristicExtractor};
pub use scorer::{ClaimSignals, ConfidenceScorer};
