//! SqliteCalibrationStore: owns the DatabaseManager and implements
//! ICalibrationStore over the calibration_records table.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};

use candor_core::config::{CalibrationConfig, CandorConfig};
use candor_core::errors::CandorResult;
use candor_core::models::calibration::is_valid_claim;
use candor_core::models::{
    CalibrationObservation, CalibrationRecord, ScopedObservations,
};
use candor_core::traits::ICalibrationStore;

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::calibration_records::{self, CalibrationRow};
use crate::to_storage_err;

/// Durable calibration history backed by SQLite.
pub struct SqliteCalibrationStore {
    db: DatabaseManager,
    config: CalibrationConfig,
}

impl SqliteCalibrationStore {
    /// Open a store backed by a file on disk.
    pub fn open(
        path: &Path,
        read_pool_size: usize,
        config: CalibrationConfig,
    ) -> CandorResult<Self> {
        config.validate()?;
        let db = DatabaseManager::open(path, read_pool_size)?;
        Ok(Self { db, config })
    }

    /// Open the store described by a full configuration.
    pub fn from_config(config: &CandorConfig) -> CandorResult<Self> {
        Self::open(
            Path::new(&config.storage.db_path),
            config.storage.read_pool_size,
            config.calibration.clone(),
        )
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory(config: CalibrationConfig) -> CandorResult<Self> {
        config.validate()?;
        let db = DatabaseManager::open_in_memory()?;
        Ok(Self { db, config })
    }

    /// Access to the underlying connections (for maintenance and tests).
    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }
}

impl ICalibrationStore for SqliteCalibrationStore {
    fn record(&self, observation: CalibrationObservation) -> CandorResult<CalibrationRecord> {
        observation.validate()?;
        let record = CalibrationRecord::from_observation(observation);
        let row = CalibrationRow {
            id: record.id.clone(),
            claimed_confidence: record.claimed_confidence,
            actual_correct: record.actual_correct,
            claim_text: record.claim_text.clone(),
            task_description: record.task_description.clone(),
            agent_name: record.agent_name.clone(),
            domain: record.domain.clone(),
            factors_json: serde_json::to_string(&record.factors_snapshot)?,
            recorded_at: record.recorded_at.to_rfc3339(),
        };

        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| calibration_records::insert(tx, &row))
        })?;

        tracing::debug!(
            id = %record.id,
            agent = %record.agent_name,
            domain = ?record.domain,
            claimed = record.claimed_confidence,
            correct = record.actual_correct,
            "recorded calibration observation"
        );
        Ok(record)
    }

    fn get(&self, id: &str) -> CandorResult<Option<CalibrationRecord>> {
        let row = self.db.with_reader(|conn| calibration_records::get(conn, id))?;
        let Some(row) = row else {
            return Ok(None);
        };

        let factors_snapshot: BTreeMap<String, f64> = serde_json::from_str(&row.factors_json)?;
        let recorded_at = DateTime::parse_from_rfc3339(&row.recorded_at)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| to_storage_err(format!("bad recorded_at for {}: {e}", row.id)))?;

        Ok(Some(CalibrationRecord {
            id: row.id,
            claimed_confidence: row.claimed_confidence,
            actual_correct: row.actual_correct,
            claim_text: row.claim_text,
            task_description: row.task_description,
            agent_name: row.agent_name,
            domain: row.domain,
            factors_snapshot,
            recorded_at,
        }))
    }

    fn count(&self) -> CandorResult<usize> {
        let n = self.db.with_reader(calibration_records::count)?;
        Ok(n.max(0) as usize)
    }

    fn scoped_observations(
        &self,
        agent_name: Option<&str>,
        domain: Option<&str>,
    ) -> CandorResult<ScopedObservations> {
        let rows = self
            .db
            .with_reader(|conn| calibration_records::scan_observations(conn, agent_name, domain))?;

        let mut scoped = ScopedObservations::default();
        for row in rows {
            match row {
                Ok((claimed, actual, factors_json))
                    if is_valid_claim(claimed) && snapshot_parses(&factors_json) =>
                {
                    scoped.observations.push((claimed, actual));
                }
                Ok((claimed, _, _)) => {
                    tracing::debug!(claimed, "skipping calibration row with invalid claim or snapshot");
                    scoped.malformed += 1;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "skipping undecodable calibration row");
                    scoped.malformed += 1;
                }
            }
        }
        Ok(scoped)
    }

    fn calibration_config(&self) -> &CalibrationConfig {
        &self.config
    }
}

fn snapshot_parses(factors_json: &str) -> bool {
    serde_json::from_str::<BTreeMap<String, f64>>(factors_json).is_ok()
}
