//! Write connection utilities: BEGIN IMMEDIATE transactions.

use candor_core::errors::StorageError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::to_storage_err;

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
/// Acquires the write lock at transaction start, preventing SQLITE_BUSY
/// mid-transaction. Dropping the transaction on error rolls it back.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| to_storage_err(format!("failed to begin immediate transaction: {e}")))?;

    let result = f(&tx)?;

    tx.commit()
        .map_err(|e| to_storage_err(format!("failed to commit: {e}")))?;

    Ok(result)
}
