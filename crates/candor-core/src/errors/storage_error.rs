/// Storage-layer errors for calibration persistence.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("{resource} lock poisoned")]
    LockPoisoned { resource: String },
}
