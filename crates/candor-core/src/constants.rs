//! Numeric constants shared across the engine.

/// Neutral starting point every raw score is built from.
pub const BASE_SCORE: f64 = 0.5;

/// Default verification threshold: final scores below this need verification.
pub const DEFAULT_VERIFICATION_THRESHOLD: f64 = 0.70;

/// Default lower bound for the calibration adjustment factor.
pub const DEFAULT_MIN_ADJUSTMENT: f64 = 0.5;

/// Default upper bound for the calibration adjustment factor.
pub const DEFAULT_MAX_ADJUSTMENT: f64 = 1.5;

/// Minimum number of records in a scope before calibration moves scores.
pub const DEFAULT_MIN_CALIBRATION_RECORDS: usize = 10;

/// Number of reliability bins over [0.0, 1.0].
pub const DEFAULT_BIN_COUNT: usize = 10;

/// Tier thresholds, each inclusive on the lower bound.
pub const DEFAULT_AUTONOMOUS_THRESHOLD: f64 = 0.85;
pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 0.70;
pub const DEFAULT_APPROVAL_THRESHOLD: f64 = 0.50;

/// Confidence level label boundaries.
pub const VERY_HIGH_LEVEL: f64 = 0.85;
pub const HIGH_LEVEL: f64 = 0.70;
pub const MEDIUM_LEVEL: f64 = 0.50;

/// Default SQLite database path.
pub const DEFAULT_DB_PATH: &str = "candor.db";

/// Default number of read connections.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Rationale attached to automatically approved decisions.
pub const AUTO_APPROVED_RATIONALE: &str = "auto-approved: tier=AUTONOMOUS";

/// Rationale attached to automatically rejected decisions.
pub const BLOCKED_RATIONALE: &str = "blocked: confidence below floor";
