//! CalibrationEngine: owns the store, scorer and gate, and wires the
//! score → decide → verify → record loop.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use candor_core::config::CandorConfig;
use candor_core::errors::CandorResult;
use candor_core::models::{
    CalibrationRecord, CalibrationStatistics, ConfidenceResponse, EscalationDecision,
};
use candor_core::traits::ICalibrationStore;
use candor_storage::{InMemoryCalibrationStore, SqliteCalibrationStore};

use crate::gate::EscalationGate;
use crate::scorer::{ClaimSignals, ConfidenceScorer};

/// A scored claim together with the decision it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub response: ConfidenceResponse,
    pub decision: EscalationDecision,
}

/// Scorer and gate sharing one injected calibration store.
pub struct CalibrationEngine {
    store: Arc<dyn ICalibrationStore>,
    scorer: ConfidenceScorer,
    gate: EscalationGate,
}

impl CalibrationEngine {
    /// Build an engine around an existing store.
    pub fn new(config: &CandorConfig, store: Arc<dyn ICalibrationStore>) -> Self {
        let scorer = ConfidenceScorer::new(config.scoring.clone()).with_store(Arc::clone(&store));
        let gate = EscalationGate::new(config.escalation.clone(), Arc::clone(&store));
        Self {
            store,
            scorer,
            gate,
        }
    }

    /// Build an engine over the SQLite database named in the config.
    pub fn open(config: &CandorConfig) -> CandorResult<Self> {
        let store = SqliteCalibrationStore::from_config(config)?;
        tracing::info!(
            db_path = %config.storage.db_path,
            read_pool_size = config.storage.read_pool_size,
            "calibration engine opened"
        );
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Build an engine with a non-durable store.
    pub fn in_memory(config: &CandorConfig) -> Self {
        let store = InMemoryCalibrationStore::new(config.calibration.clone());
        Self::new(config, Arc::new(store))
    }

    pub fn scorer(&self) -> &ConfidenceScorer {
        &self.scorer
    }

    pub fn gate(&self) -> &EscalationGate {
        &self.gate
    }

    pub fn store(&self) -> &Arc<dyn ICalibrationStore> {
        &self.store
    }

    /// Score a claim and decide on it in one call.
    pub fn evaluate(
        &self,
        claim_text: &str,
        agent_name: &str,
        domain: Option<&str>,
        signals: ClaimSignals,
        risk_factors: &[String],
    ) -> Evaluation {
        let response = self.scorer.score(claim_text, agent_name, domain, signals);
        let decision = self.gate.decide_response(&response, risk_factors);
        Evaluation { response, decision }
    }

    /// Feed a verifier's verdict on an evaluated claim back into calibration.
    pub fn record_outcome(
        &self,
        evaluation: &Evaluation,
        actual_correct: bool,
        task_description: &str,
    ) -> CandorResult<CalibrationRecord> {
        self.gate.record_outcome(
            &evaluation.response,
            &evaluation.decision,
            actual_correct,
            task_description,
        )
    }

    /// Calibration statistics for a scope, neutral when unavailable.
    pub fn statistics(
        &self,
        agent_name: Option<&str>,
        domain: Option<&str>,
    ) -> CalibrationStatistics {
        self.store.statistics(agent_name, domain)
    }
}
