use serde::{Deserialize, Serialize};

use crate::constants;

/// Confidence scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Final scores strictly below this are flagged `verification_needed`.
    pub verification_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            verification_threshold: constants::DEFAULT_VERIFICATION_THRESHOLD,
        }
    }
}
