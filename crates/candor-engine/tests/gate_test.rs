//! EscalationGate: tiering, risk floor, the decision lifecycle, overrides.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use candor_core::config::{CalibrationConfig, EscalationConfig};
use candor_core::constants::{AUTO_APPROVED_RATIONALE, BLOCKED_RATIONALE};
use candor_core::errors::{CandorError, EscalationError};
use candor_core::models::{ConfidenceResponse, DecisionStatus, EscalationTier};
use candor_core::traits::ICalibrationStore;
use candor_engine::EscalationGate;
use candor_storage::InMemoryCalibrationStore;

fn gate() -> (EscalationGate, Arc<InMemoryCalibrationStore>) {
    let store = Arc::new(InMemoryCalibrationStore::new(CalibrationConfig::default()));
    (EscalationGate::new(EscalationConfig::default(), store.clone()), store)
}

fn risks(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// A response whose final score is pinned, as if scored elsewhere.
fn response(final_score: f64) -> ConfidenceResponse {
    let mut response = ConfidenceResponse::compute(
        "claim",
        "agent-a",
        Some("rust".to_string()),
        Vec::new(),
        1.0,
        0.70,
    );
    response.raw_score = final_score;
    response.final_score = final_score;
    response
}

#[test]
fn high_score_without_risk_is_auto_approved() {
    let (gate, _) = gate();
    let d = gate.decide(0.90, &[]);
    assert_eq!(d.tier, EscalationTier::Autonomous);
    assert_eq!(d.status, DecisionStatus::Approved);
    assert_eq!(d.rationale, AUTO_APPROVED_RATIONALE);
    assert!(d.decided_at.is_some());
    assert!(gate.pending().is_empty());
}

#[test]
fn risk_floors_high_score_at_approval_required() {
    let (gate, _) = gate();
    let d = gate.decide(0.90, &risks(&["irreversible"]));
    assert_eq!(d.tier, EscalationTier::ApprovalRequired);
    assert_eq!(d.status, DecisionStatus::Pending);
    assert!(d.rationale.contains("irreversible"));
    assert_eq!(d.risk_factors, risks(&["irreversible"]));
}

#[test]
fn risk_never_upgrades_a_blocked_claim() {
    let (gate, _) = gate();
    let d = gate.decide(0.30, &risks(&["conflicting"]));
    assert_eq!(d.tier, EscalationTier::Blocked);
    assert_eq!(d.status, DecisionStatus::Rejected);
}

#[test]
fn low_score_is_blocked_and_rejected() {
    let (gate, _) = gate();
    let d = gate.decide(0.40, &[]);
    assert_eq!(d.tier, EscalationTier::Blocked);
    assert_eq!(d.status, DecisionStatus::Rejected);
    assert_eq!(d.rationale, BLOCKED_RATIONALE);
}

#[test]
fn thresholds_are_inclusive_on_the_lower_bound() {
    let (gate, _) = gate();
    let cases = [
        (1.0, EscalationTier::Autonomous),
        (0.85, EscalationTier::Autonomous),
        (0.849_999, EscalationTier::Suggest),
        (0.70, EscalationTier::Suggest),
        (0.699_999, EscalationTier::ApprovalRequired),
        (0.50, EscalationTier::ApprovalRequired),
        (0.499_999, EscalationTier::Blocked),
        (0.0, EscalationTier::Blocked),
        (f64::NAN, EscalationTier::Blocked),
    ];
    for (score, tier) in cases {
        assert_eq!(gate.decide(score, &[]).tier, tier, "score {score}");
    }
}

#[test]
fn pending_decision_resolves_exactly_once() {
    let (gate, _) = gate();
    let d = gate.decide(0.75, &[]);
    assert_eq!(d.tier, EscalationTier::Suggest);
    assert_eq!(gate.pending().len(), 1);

    let resolved = gate.resolve(&d, true, "reviewed by maintainer").unwrap();
    assert_eq!(resolved.status, DecisionStatus::Approved);
    assert_eq!(resolved.rationale, "reviewed by maintainer");
    assert!(resolved.decided_at.is_some());
    assert!(gate.pending().is_empty());

    let err = gate.resolve(&d, false, "second thoughts").unwrap_err();
    assert!(matches!(
        err,
        CandorError::Escalation(EscalationError::AlreadyResolved {
            status: DecisionStatus::Approved,
            ..
        })
    ));
    // The first write stands.
    assert_eq!(gate.get(&d.id).unwrap().status, DecisionStatus::Approved);
}

#[test]
fn automatic_decisions_cannot_be_resolved() {
    let (gate, _) = gate();
    for score in [0.95, 0.10] {
        let d = gate.decide(score, &[]);
        let err = gate.resolve(&d, true, "manual").unwrap_err();
        assert!(matches!(
            err,
            CandorError::Escalation(EscalationError::AlreadyResolved { .. })
        ));
    }
}

#[test]
fn foreign_decision_is_unknown() {
    let (a, _) = gate();
    let (b, _) = gate();
    let d = a.decide(0.60, &[]);
    let err = b.resolve(&d, true, "wrong gate").unwrap_err();
    assert!(matches!(
        err,
        CandorError::Escalation(EscalationError::UnknownDecision { .. })
    ));
}

#[test]
fn override_is_a_separate_record() {
    let (gate, _) = gate();
    let blocked = gate.decide(0.20, &[]);

    let over = gate
        .override_decision(&blocked.id, true, "operator accepted the risk")
        .unwrap();
    assert_ne!(over.id, blocked.id);
    assert_eq!(over.overrides.as_deref(), Some(blocked.id.as_str()));
    assert_eq!(over.status, DecisionStatus::Approved);
    assert_eq!(over.tier, EscalationTier::Blocked);
    assert_eq!(over.rationale, "operator accepted the risk");

    let original = gate.get(&blocked.id).unwrap();
    assert_eq!(original, blocked);
    assert_eq!(gate.len(), 2);
}

#[test]
fn pending_decision_cannot_be_overridden() {
    let (gate, _) = gate();
    let d = gate.decide(0.60, &[]);
    let err = gate.override_decision(&d.id, true, "skip review").unwrap_err();
    assert!(matches!(
        err,
        CandorError::Escalation(EscalationError::NotOverridable { .. })
    ));
    let err = gate.override_decision("missing", true, "x").unwrap_err();
    assert!(matches!(
        err,
        CandorError::Escalation(EscalationError::UnknownDecision { .. })
    ));
}

#[test]
fn pending_lists_only_open_decisions() {
    let (gate, _) = gate();
    let open_a = gate.decide(0.72, &[]);
    let open_b = gate.decide(0.55, &[]);
    gate.decide(0.99, &[]);
    gate.decide(0.01, &[]);

    let ids: Vec<String> = gate.pending().into_iter().map(|d| d.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&open_a.id));
    assert!(ids.contains(&open_b.id));
}

#[test]
fn take_terminal_drains_settled_decisions_only() {
    let (gate, _) = gate();
    let open = gate.decide(0.72, &[]);
    let resolved = gate.decide(0.55, &[]);
    gate.resolve(&resolved, false, "not this one").unwrap();
    let auto = gate.decide(0.99, &[]);
    let blocked = gate.decide(0.01, &[]);
    let overridden = gate.override_decision(&blocked.id, true, "owner sign-off").unwrap();
    assert_eq!(gate.len(), 5);

    let drained = gate.take_terminal();
    let ids: Vec<&str> = drained.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids.len(), 4);
    for id in [&resolved.id, &auto.id, &blocked.id, &overridden.id] {
        assert!(ids.contains(&id.as_str()));
    }
    assert!(drained.iter().all(|d| d.is_terminal()));
    assert!(drained.windows(2).all(|w| w[0].created_at <= w[1].created_at));

    assert_eq!(gate.len(), 1);
    assert_eq!(gate.get(&open.id).unwrap().status, DecisionStatus::Pending);
    assert!(gate.get(&auto.id).is_none());
    assert!(gate.take_terminal().is_empty());

    let err = gate.override_decision(&auto.id, false, "too late").unwrap_err();
    assert!(matches!(
        err,
        CandorError::Escalation(EscalationError::UnknownDecision { .. })
    ));
}

#[test]
fn drained_decision_outcome_is_unknown() {
    let (gate, store) = gate();
    let r = response(0.95);
    let d = gate.decide_response(&r, &[]);
    assert_eq!(gate.take_terminal().len(), 1);

    let err = gate.record_outcome(&r, &d, true, "verify").unwrap_err();
    assert!(matches!(
        err,
        CandorError::Escalation(EscalationError::UnknownDecision { .. })
    ));
    assert_eq!(store.count().unwrap(), 0);
    assert!(gate.is_empty());
}

#[test]
fn outcome_on_pending_decision_is_refused() {
    let (gate, store) = gate();
    let r = response(0.60);
    let d = gate.decide_response(&r, &[]);
    let err = gate.record_outcome(&r, &d, true, "verify").unwrap_err();
    assert!(matches!(
        err,
        CandorError::Escalation(EscalationError::NotResolved { .. })
    ));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn outcome_uses_the_decision_score() {
    let (gate, store) = gate();
    let mut r = response(0.62);
    r.factors.push(candor_core::models::UncertaintyFactor::new(
        candor_core::models::FactorCategory::Recency,
        "recent",
        0.2,
    ));
    let d = gate.decide_response(&r, &[]);
    // A stale copy of the decision still works once the ledger is terminal.
    gate.resolve(&d, true, "looks right").unwrap();

    let record = gate.record_outcome(&r, &d, false, "unit test run").unwrap();
    assert_eq!(record.claimed_confidence, 0.62);
    assert!(!record.actual_correct);
    assert_eq!(record.agent_name, "agent-a");
    assert_eq!(record.domain.as_deref(), Some("rust"));
    assert_eq!(record.task_description, "unit test run");
    let mut expected = BTreeMap::new();
    expected.insert("recency".to_string(), 0.2);
    assert_eq!(record.factors_snapshot, expected);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn concurrent_resolution_has_one_winner() {
    let (gate, _) = gate();
    let gate = Arc::new(gate);
    let d = gate.decide(0.60, &[]);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let gate = Arc::clone(&gate);
            let d = d.clone();
            thread::spawn(move || gate.resolve(&d, i % 2 == 0, &format!("reviewer {i}")).is_ok())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(winners, 1);
    assert!(gate.get(&d.id).unwrap().is_terminal());
}
