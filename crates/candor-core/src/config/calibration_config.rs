use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::ConfigError;

/// Calibration statistics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Lower clamp for the adjustment factor. Default: 0.5.
    pub min_adjustment: f64,
    /// Upper clamp for the adjustment factor. Default: 1.5.
    pub max_adjustment: f64,
    /// Below this many valid records the adjustment factor stays 1.0. Default: 10.
    pub min_calibration_records: usize,
    /// Number of reliability bins. Default: 10.
    pub bin_count: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_adjustment: constants::DEFAULT_MIN_ADJUSTMENT,
            max_adjustment: constants::DEFAULT_MAX_ADJUSTMENT,
            min_calibration_records: constants::DEFAULT_MIN_CALIBRATION_RECORDS,
            bin_count: constants::DEFAULT_BIN_COUNT,
        }
    }
}

impl CalibrationConfig {
    /// Whether the adjustment bounds can be used as a clamp range.
    pub fn has_usable_bounds(&self) -> bool {
        self.min_adjustment.is_finite()
            && self.max_adjustment.is_finite()
            && self.min_adjustment > 0.0
            && self.min_adjustment <= self.max_adjustment
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_adjustment.is_finite() && self.min_adjustment > 0.0) {
            return Err(ConfigError::ValidationFailed {
                field: "calibration.min_adjustment".to_string(),
                message: "must be a positive number".to_string(),
            });
        }
        if !(self.max_adjustment.is_finite() && self.max_adjustment >= self.min_adjustment) {
            return Err(ConfigError::ValidationFailed {
                field: "calibration.max_adjustment".to_string(),
                message: "must be greater than or equal to min_adjustment".to_string(),
            });
        }
        if self.bin_count == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "calibration.bin_count".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
