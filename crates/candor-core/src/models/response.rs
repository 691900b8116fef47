use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::factor::{FactorCategory, UncertaintyFactor};
use crate::constants;

/// Coarse label derived from a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= constants::VERY_HIGH_LEVEL {
            Self::VeryHigh
        } else if score >= constants::HIGH_LEVEL {
            Self::High
        } else if score >= constants::MEDIUM_LEVEL {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryHigh => "very_high",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The scored output for one claim. Built once, never mutated; re-scoring
/// produces a new instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResponse {
    /// Claim text, opaque to the engine.
    pub content: String,
    pub agent_name: String,
    pub domain: Option<String>,
    /// Factors in evaluation order.
    pub factors: Vec<UncertaintyFactor>,
    /// `clamp(0.5 + Σ impact, 0.0, 1.0)`.
    pub raw_score: f64,
    /// Multiplier applied at scoring time; 1.0 when uncalibrated.
    pub calibration_adjustment: f64,
    /// `clamp(raw_score * calibration_adjustment, 0.0, 1.0)`.
    pub final_score: f64,
    pub verification_needed: bool,
    pub confidence_level: ConfidenceLevel,
}

impl ConfidenceResponse {
    /// Compute every derived field from the factors and the adjustment.
    ///
    /// Both clamps are applied: once on the raw sum and once after the
    /// calibration multiply.
    pub fn compute(
        content: impl Into<String>,
        agent_name: impl Into<String>,
        domain: Option<String>,
        factors: Vec<UncertaintyFactor>,
        calibration_adjustment: f64,
        verification_threshold: f64,
    ) -> Self {
        let raw_score = raw_score(&factors);
        let final_score = clamp_unit(raw_score * calibration_adjustment);
        Self {
            content: content.into(),
            agent_name: agent_name.into(),
            domain,
            factors,
            raw_score,
            calibration_adjustment,
            final_score,
            verification_needed: final_score < verification_threshold,
            confidence_level: ConfidenceLevel::from_score(final_score),
        }
    }

    /// Summed impact per category name, as persisted with calibration records.
    pub fn factors_snapshot(&self) -> BTreeMap<String, f64> {
        let mut snapshot = BTreeMap::new();
        for factor in &self.factors {
            *snapshot.entry(factor.category.as_str().to_string()).or_insert(0.0) += factor.impact;
        }
        snapshot
    }

    /// Summed impact for one category.
    pub fn category_total(&self, category: FactorCategory) -> f64 {
        self.factors
            .iter()
            .filter(|f| f.category == category)
            .map(|f| f.impact)
            .sum()
    }
}

/// `clamp(BASE_SCORE + Σ impact, 0.0, 1.0)`.
pub fn raw_score(factors: &[UncertaintyFactor]) -> f64 {
    let total: f64 = factors.iter().map(|f| f.impact).sum();
    clamp_unit(constants::BASE_SCORE + total)
}

/// Clamp into [0.0, 1.0]; non-finite input collapses to 0.0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
