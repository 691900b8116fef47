//! Error handling for Candor.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod escalation_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use escalation_error::EscalationError;
pub use storage_error::StorageError;

/// Top-level error aggregating every subsystem error.
#[derive(Debug, thiserror::Error)]
pub enum CandorError {
    /// The calibration store could not be reached or rejected the operation.
    #[error("calibration storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    #[error("escalation error: {0}")]
    Escalation(#[from] EscalationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An observation was refused before it reached storage.
    #[error("invalid calibration observation: {reason}")]
    InvalidObservation { reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CandorResult<T> = Result<T, CandorError>;
