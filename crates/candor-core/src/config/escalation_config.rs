use serde::{Deserialize, Serialize};

use crate::constants;
use crate::models::EscalationTier;

/// Tier thresholds for the escalation gate. Each is inclusive on its lower bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    pub autonomous_threshold: f64,
    pub suggest_threshold: f64,
    pub approval_threshold: f64,
}

impl EscalationConfig {
    /// Map a final score onto a tier, ignoring risk factors.
    pub fn tier_for(&self, final_score: f64) -> EscalationTier {
        if final_score >= self.autonomous_threshold {
            EscalationTier::Autonomous
        } else if final_score >= self.suggest_threshold {
            EscalationTier::Suggest
        } else if final_score >= self.approval_threshold {
            EscalationTier::ApprovalRequired
        } else {
            // NaN lands here too.
            EscalationTier::Blocked
        }
    }
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            autonomous_threshold: constants::DEFAULT_AUTONOMOUS_THRESHOLD,
            suggest_threshold: constants::DEFAULT_SUGGEST_THRESHOLD,
            approval_threshold: constants::DEFAULT_APPROVAL_THRESHOLD,
        }
    }
}
