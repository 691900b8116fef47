//! Queries for the calibration_records table: append-only log of
//! (claimed confidence, actual outcome) observations.

use candor_core::errors::StorageError;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::to_storage_err;

/// A calibration row as stored, before snapshot and timestamp decoding.
#[derive(Debug, Clone)]
pub struct CalibrationRow {
    pub id: String,
    pub claimed_confidence: f64,
    pub actual_correct: bool,
    pub claim_text: String,
    pub task_description: String,
    pub agent_name: String,
    pub domain: Option<String>,
    pub factors_json: String,
    pub recorded_at: String,
}

/// The columns statistics need. `Err` marks a row that failed to decode.
pub type ObservationRow = Result<(f64, bool, String), String>;

/// Insert one calibration row.
pub fn insert(conn: &Connection, row: &CalibrationRow) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO calibration_records
            (id, claimed_confidence, actual_correct, claim_text, task_description,
             agent_name, domain, factors_json, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            row.id,
            row.claimed_confidence,
            row.actual_correct as i64,
            row.claim_text,
            row.task_description,
            row.agent_name,
            row.domain,
            row.factors_json,
            row.recorded_at,
        ])
    })
    .map_err(|e| to_storage_err(format!("insert calibration record: {e}")))?;
    Ok(())
}

/// Fetch one row by id.
pub fn get(conn: &Connection, id: &str) -> Result<Option<CalibrationRow>, StorageError> {
    conn.query_row(
        "SELECT id, claimed_confidence, actual_correct, claim_text, task_description,
                agent_name, domain, factors_json, recorded_at
         FROM calibration_records WHERE id = ?1",
        params![id],
        |row| {
            Ok(CalibrationRow {
                id: row.get(0)?,
                claimed_confidence: row.get(1)?,
                actual_correct: row.get::<_, i64>(2)? != 0,
                claim_text: row.get(3)?,
                task_description: row.get(4)?,
                agent_name: row.get(5)?,
                domain: row.get(6)?,
                factors_json: row.get(7)?,
                recorded_at: row.get(8)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Scan the observation columns of a scope. `None` filters match everything.
///
/// Rows that fail to decode are returned as `Err` so the caller can count
/// them instead of aborting the scan.
pub fn scan_observations(
    conn: &Connection,
    agent_name: Option<&str>,
    domain: Option<&str>,
) -> Result<Vec<ObservationRow>, StorageError> {
    let (filter, args): (&str, Vec<&str>) = match (agent_name, domain) {
        (Some(a), Some(d)) => ("WHERE agent_name = ?1 AND domain = ?2", vec![a, d]),
        (Some(a), None) => ("WHERE agent_name = ?1", vec![a]),
        (None, Some(d)) => ("WHERE domain = ?1", vec![d]),
        (None, None) => ("", vec![]),
    };
    let sql = format!(
        "SELECT claimed_confidence, actual_correct, factors_json
         FROM calibration_records {filter}"
    );

    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(args), |row| {
            Ok(decode_observation(row).map_err(|e| e.to_string()))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

fn decode_observation(row: &Row<'_>) -> rusqlite::Result<(f64, bool, String)> {
    Ok((
        row.get::<_, f64>(0)?,
        row.get::<_, i64>(1)? != 0,
        row.get::<_, String>(2)?,
    ))
}

/// Count all rows.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM calibration_records", [], |row| {
        row.get(0)
    })
    .map_err(|e| to_storage_err(e.to_string()))
}
