use serde::{Deserialize, Serialize};

use crate::constants;

/// Calibration store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub db_path: String,
    /// Number of read-only connections (clamped to 1..=8 at open).
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: constants::DEFAULT_DB_PATH.to_string(),
            read_pool_size: constants::DEFAULT_READ_POOL_SIZE,
        }
    }
}
