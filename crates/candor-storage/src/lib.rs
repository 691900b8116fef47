//! # candor-storage
//!
//! Durable calibration history. A single serialized writer plus a pool of
//! read-only connections over SQLite in WAL mode, so statistics reads are
//! never blocked by appends. Also ships an in-memory store for tests and
//! embedding.

pub mod connection;
pub mod engine;
pub mod memory;
pub mod migrations;
pub mod queries;

pub use connection::DatabaseManager;
pub use engine::SqliteCalibrationStore;
pub use memory::InMemoryCalibrationStore;

use candor_core::errors::StorageError;

/// Wrap any SQLite failure message as a storage error.
pub(crate) fn to_storage_err(message: impl Into<String>) -> StorageError {
    StorageError::SqliteError {
        message: message.into(),
    }
}
