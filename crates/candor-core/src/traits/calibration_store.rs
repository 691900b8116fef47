use crate::config::CalibrationConfig;
use crate::errors::CandorResult;
use crate::models::{
    CalibrationObservation, CalibrationRecord, CalibrationStatistics, ScopedObservations,
};
use crate::stats;

/// Durable, append-only log of calibration observations.
///
/// Implementations serialize appends internally and must not block readers.
/// Reads see a point-in-time snapshot that may lag concurrent appends.
pub trait ICalibrationStore: Send + Sync {
    /// Append one observation. Fails with `StorageUnavailable` if the
    /// backing store cannot take the write; never retries internally.
    fn record(&self, observation: CalibrationObservation) -> CandorResult<CalibrationRecord>;

    /// Fetch a stored record by id.
    fn get(&self, id: &str) -> CandorResult<Option<CalibrationRecord>>;

    /// Number of stored records, including malformed ones.
    fn count(&self) -> CandorResult<usize>;

    /// The `(claimed, actual)` pairs of a scope. `None` matches everything.
    /// Malformed rows are skipped and counted, never fatal.
    fn scoped_observations(
        &self,
        agent_name: Option<&str>,
        domain: Option<&str>,
    ) -> CandorResult<ScopedObservations>;

    /// Bounds and sample floor used when deriving the adjustment factor.
    fn calibration_config(&self) -> &CalibrationConfig;

    /// Aggregate statistics for a scope, surfacing storage failures.
    fn try_statistics(
        &self,
        agent_name: Option<&str>,
        domain: Option<&str>,
    ) -> CandorResult<CalibrationStatistics> {
        let _span = crate::calibration_span!(agent_name, domain).entered();
        let scoped = self.scoped_observations(agent_name, domain)?;
        if scoped.malformed > 0 {
            tracing::warn!(
                agent = ?agent_name,
                domain = ?domain,
                malformed = scoped.malformed,
                "skipped malformed calibration records"
            );
        }
        Ok(stats::aggregate(
            agent_name,
            domain,
            &scoped,
            self.calibration_config(),
        ))
    }

    /// Aggregate statistics for a scope, degrading to neutral statistics
    /// (adjustment factor 1.0) when the store is unreachable.
    fn statistics(&self, agent_name: Option<&str>, domain: Option<&str>) -> CalibrationStatistics {
        match self.try_statistics(agent_name, domain) {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(
                    agent = ?agent_name,
                    domain = ?domain,
                    error = %e,
                    "calibration statistics unavailable, using neutral defaults"
                );
                CalibrationStatistics::neutral(agent_name, domain)
            }
        }
    }

    /// The multiplicative correction for a scope.
    fn adjustment_factor(&self, agent_name: Option<&str>, domain: Option<&str>) -> f64 {
        self.statistics(agent_name, domain).adjustment_factor
    }
}
