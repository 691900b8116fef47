//! In-memory calibration store. Same contract as the SQLite store, without
//! durability; used as the injected substitute in tests and embeddings.

use std::sync::RwLock;

use candor_core::config::CalibrationConfig;
use candor_core::errors::{CandorResult, StorageError};
use candor_core::models::{CalibrationObservation, CalibrationRecord, ScopedObservations};
use candor_core::traits::ICalibrationStore;

/// Calibration history held in process memory.
#[derive(Default)]
pub struct InMemoryCalibrationStore {
    records: RwLock<Vec<CalibrationRecord>>,
    config: CalibrationConfig,
}

impl InMemoryCalibrationStore {
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            config,
        }
    }

    /// Seed the store with existing records, e.g. an exported history.
    pub fn from_records(records: Vec<CalibrationRecord>, config: CalibrationConfig) -> Self {
        Self {
            records: RwLock::new(records),
            config,
        }
    }

    fn poisoned() -> StorageError {
        StorageError::LockPoisoned {
            resource: "in-memory calibration records".to_string(),
        }
    }
}

impl ICalibrationStore for InMemoryCalibrationStore {
    fn record(&self, observation: CalibrationObservation) -> CandorResult<CalibrationRecord> {
        observation.validate()?;
        let record = CalibrationRecord::from_observation(observation);
        self.records
            .write()
            .map_err(|_| Self::poisoned())?
            .push(record.clone());
        Ok(record)
    }

    fn get(&self, id: &str) -> CandorResult<Option<CalibrationRecord>> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    fn count(&self) -> CandorResult<usize> {
        Ok(self.records.read().map_err(|_| Self::poisoned())?.len())
    }

    fn scoped_observations(
        &self,
        agent_name: Option<&str>,
        domain: Option<&str>,
    ) -> CandorResult<ScopedObservations> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        let mut scoped = ScopedObservations::default();
        for record in records.iter().filter(|r| {
            agent_name.map_or(true, |a| r.agent_name == a)
                && domain.map_or(true, |d| r.domain.as_deref() == Some(d))
        }) {
            if record.is_well_formed() {
                scoped
                    .observations
                    .push((record.claimed_confidence, record.actual_correct));
            } else {
                scoped.malformed += 1;
            }
        }
        Ok(scoped)
    }

    fn calibration_config(&self) -> &CalibrationConfig {
        &self.config
    }
}
