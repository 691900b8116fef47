//! EscalationGate: maps a final score and declared risks onto an action
//! tier, and keeps the audit ledger of every decision it issued.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use candor_core::config::EscalationConfig;
use candor_core::constants::{AUTO_APPROVED_RATIONALE, BLOCKED_RATIONALE};
use candor_core::errors::{CandorResult, EscalationError};
use candor_core::models::{
    CalibrationObservation, CalibrationRecord, ConfidenceResponse, DecisionStatus,
    EscalationDecision, EscalationTier,
};
use candor_core::traits::ICalibrationStore;

/// Issues and resolves escalation decisions.
///
/// Decisions are audit records: each receives exactly one terminal write.
/// A later change of mind is a separate override record.
pub struct EscalationGate {
    config: EscalationConfig,
    ledger: DashMap<String, EscalationDecision>,
    store: Arc<dyn ICalibrationStore>,
}

impl EscalationGate {
    pub fn new(config: EscalationConfig, store: Arc<dyn ICalibrationStore>) -> Self {
        Self {
            config,
            ledger: DashMap::new(),
            store,
        }
    }

    pub fn config(&self) -> &EscalationConfig {
        &self.config
    }

    /// Assign a tier and open a decision.
    ///
    /// `Autonomous` is approved and `Blocked` rejected on the spot; the other
    /// tiers stay `Pending` until [`resolve`](Self::resolve). Any declared risk
    /// floors the tier at `ApprovalRequired`.
    pub fn decide(&self, final_score: f64, risk_factors: &[String]) -> EscalationDecision {
        let _span = candor_core::escalation_span!(final_score).entered();

        let by_score = self.config.tier_for(final_score);
        let tier = if risk_factors.is_empty() {
            by_score
        } else {
            by_score.at_least(EscalationTier::ApprovalRequired)
        };

        let decision = match tier {
            EscalationTier::Autonomous => terminal(
                EscalationDecision::pending(tier, final_score, risk_factors.to_vec(), AUTO_APPROVED_RATIONALE),
                true,
            ),
            EscalationTier::Blocked => terminal(
                EscalationDecision::pending(tier, final_score, risk_factors.to_vec(), BLOCKED_RATIONALE),
                false,
            ),
            EscalationTier::Suggest | EscalationTier::ApprovalRequired => {
                let rationale = if tier != by_score {
                    format!(
                        "awaiting resolution: tier={} (risk floor from {}: {})",
                        tier.as_str(),
                        by_score.as_str(),
                        risk_factors.join(", ")
                    )
                } else {
                    format!("awaiting resolution: tier={}", tier.as_str())
                };
                EscalationDecision::pending(tier, final_score, risk_factors.to_vec(), rationale)
            }
        };

        tracing::info!(
            id = %decision.id,
            tier = decision.tier.as_str(),
            status = %decision.status,
            risks = decision.risk_factors.len(),
            "escalation decision issued"
        );
        self.ledger.insert(decision.id.clone(), decision.clone());
        decision
    }

    /// Decide on a scored response.
    pub fn decide_response(
        &self,
        response: &ConfidenceResponse,
        risk_factors: &[String],
    ) -> EscalationDecision {
        self.decide(response.final_score, risk_factors)
    }

    /// The single terminal write of a pending decision.
    ///
    /// Fails with `AlreadyResolved` if the decision is terminal, including
    /// decisions the gate settled automatically.
    pub fn resolve(
        &self,
        decision: &EscalationDecision,
        approved: bool,
        rationale: &str,
    ) -> CandorResult<EscalationDecision> {
        let mut entry =
            self.ledger
                .get_mut(&decision.id)
                .ok_or_else(|| EscalationError::UnknownDecision {
                    decision_id: decision.id.clone(),
                })?;

        if entry.is_terminal() {
            return Err(EscalationError::AlreadyResolved {
                decision_id: entry.id.clone(),
                status: entry.status,
            }
            .into());
        }

        entry.status = DecisionStatus::from_approved(approved);
        entry.rationale = rationale.to_string();
        entry.decided_at = Some(Utc::now());

        tracing::info!(
            id = %entry.id,
            tier = entry.tier.as_str(),
            status = %entry.status,
            "escalation decision resolved"
        );
        Ok(entry.value().clone())
    }

    /// Record a human override of a terminal decision.
    ///
    /// The original stays untouched; the override is a new terminal record
    /// whose `overrides` points at it.
    pub fn override_decision(
        &self,
        decision_id: &str,
        approved: bool,
        rationale: &str,
    ) -> CandorResult<EscalationDecision> {
        let original = self
            .get(decision_id)
            .ok_or_else(|| EscalationError::UnknownDecision {
                decision_id: decision_id.to_string(),
            })?;

        if !original.is_terminal() {
            return Err(EscalationError::NotOverridable {
                decision_id: decision_id.to_string(),
                reason: "decision is pending, resolve it instead".to_string(),
            }
            .into());
        }

        let mut record = terminal(
            EscalationDecision::pending(
                original.tier,
                original.final_score,
                original.risk_factors.clone(),
                rationale,
            ),
            approved,
        );
        record.overrides = Some(original.id.clone());

        tracing::warn!(
            id = %record.id,
            overrides = %original.id,
            tier = original.tier.as_str(),
            from = %original.status,
            to = %record.status,
            "escalation decision overridden"
        );
        self.ledger.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Current state of a decision issued by this gate.
    pub fn get(&self, decision_id: &str) -> Option<EscalationDecision> {
        self.ledger.get(decision_id).map(|d| d.value().clone())
    }

    /// Decisions still awaiting resolution, oldest first.
    pub fn pending(&self) -> Vec<EscalationDecision> {
        let mut pending: Vec<EscalationDecision> = self
            .ledger
            .iter()
            .filter(|d| d.status == DecisionStatus::Pending)
            .map(|d| d.value().clone())
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        pending
    }

    /// Remove every terminal decision from the ledger and return them,
    /// oldest first, for archiving. Pending decisions stay.
    ///
    /// A drained decision is unknown to the gate afterwards: overriding it or
    /// recording its outcome fails with `UnknownDecision`.
    pub fn take_terminal(&self) -> Vec<EscalationDecision> {
        let ids: Vec<String> = self
            .ledger
            .iter()
            .filter(|d| d.is_terminal())
            .map(|d| d.key().clone())
            .collect();

        let mut drained: Vec<EscalationDecision> = ids
            .iter()
            .filter_map(|id| self.ledger.remove_if(id, |_, d| d.is_terminal()))
            .map(|(_, d)| d)
            .collect();
        drained.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        tracing::info!(
            drained = drained.len(),
            remaining = self.ledger.len(),
            "terminal decisions drained"
        );
        drained
    }

    /// Number of decisions in the ledger, overrides included.
    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Feed a verified outcome back into calibration history.
    ///
    /// The decision must be terminal; its `final_score` becomes the claimed
    /// confidence and the response's factors become the snapshot.
    pub fn record_outcome(
        &self,
        response: &ConfidenceResponse,
        decision: &EscalationDecision,
        actual_correct: bool,
        task_description: &str,
    ) -> CandorResult<CalibrationRecord> {
        let current = self
            .get(&decision.id)
            .ok_or_else(|| EscalationError::UnknownDecision {
                decision_id: decision.id.clone(),
            })?;
        if !current.is_terminal() {
            return Err(EscalationError::NotResolved {
                decision_id: current.id,
            }
            .into());
        }

        let record = self.store.record(CalibrationObservation {
            claimed_confidence: current.final_score,
            actual_correct,
            claim_text: response.content.clone(),
            task_description: task_description.to_string(),
            agent_name: response.agent_name.clone(),
            domain: response.domain.clone(),
            factors_snapshot: response.factors_snapshot(),
        })?;

        tracing::info!(
            decision = %current.id,
            record = %record.id,
            claimed = current.final_score,
            correct = actual_correct,
            "outcome recorded"
        );
        Ok(record)
    }
}

/// Apply the terminal write to a freshly built decision.
fn terminal(mut decision: EscalationDecision, approved: bool) -> EscalationDecision {
    decision.status = DecisionStatus::from_approved(approved);
    decision.decided_at = Some(Utc::now());
    decision
}
