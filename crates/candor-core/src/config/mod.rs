//! Configuration system for Candor.
//! TOML-based, 3-layer resolution: env > file > defaults.

pub mod calibration_config;
pub mod candor_config;
pub mod escalation_config;
pub mod scoring_config;
pub mod storage_config;

pub use calibration_config::CalibrationConfig;
pub use candor_config::CandorConfig;
pub use escalation_config::EscalationConfig;
pub use scoring_config::ScoringConfig;
pub use storage_config::StorageConfig;
