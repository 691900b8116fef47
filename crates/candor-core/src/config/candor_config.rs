//! Top-level Candor configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{CalibrationConfig, EscalationConfig, ScoringConfig, StorageConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CANDOR_*`)
/// 2. Config file (`candor.toml`)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CandorConfig {
    pub scoring: ScoringConfig,
    pub calibration: CalibrationConfig,
    pub escalation: EscalationConfig,
    pub storage: StorageConfig,
}

impl CandorConfig {
    /// Load configuration from an optional TOML file, then apply `CANDOR_*`
    /// environment overrides and validate the result.
    ///
    /// A missing file at an explicitly given path is an error; pass `None`
    /// to start from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply overrides from a key lookup. Unparseable values are ignored.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CANDOR_VERIFICATION_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.scoring.verification_threshold = v;
        }
        if let Some(v) = lookup("CANDOR_MIN_ADJUSTMENT").and_then(|v| v.parse().ok()) {
            self.calibration.min_adjustment = v;
        }
        if let Some(v) = lookup("CANDOR_MAX_ADJUSTMENT").and_then(|v| v.parse().ok()) {
            self.calibration.max_adjustment = v;
        }
        if let Some(v) = lookup("CANDOR_MIN_CALIBRATION_RECORDS").and_then(|v| v.parse().ok()) {
            self.calibration.min_calibration_records = v;
        }
        if let Some(v) = lookup("CANDOR_DB_PATH") {
            self.storage.db_path = v;
        }
        if let Some(v) = lookup("CANDOR_READ_POOL_SIZE").and_then(|v| v.parse().ok()) {
            self.storage.read_pool_size = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("scoring.verification_threshold", self.scoring.verification_threshold)?;

        self.calibration.validate()?;

        let esc = &self.escalation;
        check_unit("escalation.autonomous_threshold", esc.autonomous_threshold)?;
        check_unit("escalation.suggest_threshold", esc.suggest_threshold)?;
        check_unit("escalation.approval_threshold", esc.approval_threshold)?;
        if !(esc.autonomous_threshold >= esc.suggest_threshold
            && esc.suggest_threshold >= esc.approval_threshold)
        {
            return Err(invalid(
                "escalation",
                "thresholds must descend: autonomous >= suggest >= approval",
            ));
        }

        if self.storage.read_pool_size == 0 {
            return Err(invalid("storage.read_pool_size", "must be greater than 0"));
        }
        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must be between 0.0 and 1.0"))
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
