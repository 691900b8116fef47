use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CandorError;

/// Input to `ICalibrationStore::record`: one closed-loop observation before
/// it is stamped with an id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationObservation {
    /// The `final_score` at the time of the claim.
    pub claimed_confidence: f64,
    pub actual_correct: bool,
    pub claim_text: String,
    pub task_description: String,
    pub agent_name: String,
    pub domain: Option<String>,
    /// Category name → summed impact, captured at scoring time.
    pub factors_snapshot: BTreeMap<String, f64>,
}

impl CalibrationObservation {
    /// Reject observations that aggregation would have to skip.
    pub fn validate(&self) -> Result<(), CandorError> {
        if !is_valid_claim(self.claimed_confidence) {
            return Err(CandorError::InvalidObservation {
                reason: format!(
                    "claimed_confidence {} is not in [0, 1]",
                    self.claimed_confidence
                ),
            });
        }
        if let Some((category, impact)) =
            self.factors_snapshot.iter().find(|(_, v)| !v.is_finite())
        {
            return Err(CandorError::InvalidObservation {
                reason: format!("factor snapshot {category} is {impact}"),
            });
        }
        Ok(())
    }
}

/// A persisted observation. Append-only: never updated or deleted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    pub id: String,
    pub claimed_confidence: f64,
    pub actual_correct: bool,
    pub claim_text: String,
    pub task_description: String,
    pub agent_name: String,
    pub domain: Option<String>,
    pub factors_snapshot: BTreeMap<String, f64>,
    pub recorded_at: DateTime<Utc>,
}

impl CalibrationRecord {
    /// Stamp an observation with a fresh id and the current time.
    pub fn from_observation(observation: CalibrationObservation) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            claimed_confidence: observation.claimed_confidence,
            actual_correct: observation.actual_correct,
            claim_text: observation.claim_text,
            task_description: observation.task_description,
            agent_name: observation.agent_name,
            domain: observation.domain,
            factors_snapshot: observation.factors_snapshot,
            recorded_at: Utc::now(),
        }
    }

    /// Whether this record may take part in aggregation.
    pub fn is_well_formed(&self) -> bool {
        is_valid_claim(self.claimed_confidence)
            && self.factors_snapshot.values().all(|v| v.is_finite())
    }
}

/// A claimed confidence usable for aggregation.
pub fn is_valid_claim(claimed: f64) -> bool {
    claimed.is_finite() && (0.0..=1.0).contains(&claimed)
}

/// The (claimed, actual) pairs of one scope, plus how many rows were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopedObservations {
    pub observations: Vec<(f64, bool)>,
    pub malformed: usize,
}

/// Statistics for one reliability bin, e.g. claims in [0.8, 0.9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub mean_claimed: f64,
    /// `mean_claimed - accuracy`; positive means overconfident in this bin.
    pub gap: f64,
}

/// Aggregate calibration metrics for a scope. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationStatistics {
    /// `None` means all agents.
    pub agent_name: Option<String>,
    /// `None` means all domains.
    pub domain: Option<String>,
    pub total_records: usize,
    pub correct_predictions: usize,
    /// Mean of `actual_correct`.
    pub accuracy: f64,
    /// `(1/N) Σ (claimed_i - actual_i)²`.
    pub brier_score: f64,
    pub mean_claimed_confidence: f64,
    /// `mean(claimed) - accuracy`; positive = overconfident.
    pub calibration_error: f64,
    /// `clamp(1 - calibration_error, min, max)`, 1.0 below the sample floor.
    pub adjustment_factor: f64,
    /// Count-weighted mean of `|gap|` over non-empty bins.
    pub expected_calibration_error: f64,
    /// Rows skipped because they could not be aggregated.
    pub malformed_records: usize,
    /// Non-empty bins in ascending order.
    pub bins: Vec<ConfidenceBin>,
}

impl CalibrationStatistics {
    /// Statistics for a scope with no usable data. Never NaN.
    pub fn neutral(agent_name: Option<&str>, domain: Option<&str>) -> Self {
        Self {
            agent_name: agent_name.map(str::to_string),
            domain: domain.map(str::to_string),
            total_records: 0,
            correct_predictions: 0,
            accuracy: 0.0,
            brier_score: 0.0,
            mean_claimed_confidence: 0.0,
            calibration_error: 0.0,
            adjustment_factor: 1.0,
            expected_calibration_error: 0.0,
            malformed_records: 0,
            bins: Vec::new(),
        }
    }

    pub fn is_overconfident(&self) -> bool {
        self.calibration_error > 0.0
    }
}
