//! End-to-end: score → decide → resolve → record → re-score.

use std::sync::Arc;
use std::thread;

use candor_core::config::CandorConfig;
use candor_core::errors::CandorError;
use candor_core::models::{DecisionStatus, EscalationTier};
use candor_engine::{CalibrationEngine, ClaimSignals};
use tempfile::tempdir;

const CLAIM: &str = "fn load_config is defined in src/config.rs line 42";

#[test]
fn feedback_loop_scales_down_an_overconfident_agent() {
    candor_core::tracing_setup::init_tracing();
    let engine = CalibrationEngine::in_memory(&CandorConfig::default());
    let signals = ClaimSignals::new(false, true, true);

    let first = engine.evaluate(CLAIM, "agent-a", Some("rust"), signals, &[]);
    assert_eq!(first.response.calibration_adjustment, 1.0);
    assert_eq!(first.decision.tier, EscalationTier::Autonomous);

    // The agent claims top confidence twenty times and is right half the time.
    let evals: Vec<_> = (0..20)
        .map(|_| engine.evaluate(CLAIM, "agent-a", Some("rust"), signals, &[]))
        .collect();
    for (i, eval) in evals.iter().enumerate() {
        assert_eq!(eval.decision.status, DecisionStatus::Approved);
        engine.record_outcome(eval, i % 2 == 0, "compile check").unwrap();
    }

    let stats = engine.statistics(Some("agent-a"), Some("rust"));
    assert_eq!(stats.total_records, 20);
    assert!(stats.calibration_error > 0.0);
    assert_eq!(stats.adjustment_factor, 0.5);

    let later = engine.evaluate(CLAIM, "agent-a", Some("rust"), signals, &[]);
    assert_eq!(later.response.calibration_adjustment, 0.5);
    assert!((later.response.final_score - 0.5).abs() < 1e-9);
    assert_eq!(later.decision.tier, EscalationTier::ApprovalRequired);
    assert_eq!(later.decision.status, DecisionStatus::Pending);
    assert!(later.response.verification_needed);
}

#[test]
fn inverted_adjustment_bounds_score_uncalibrated() {
    let config =
        CandorConfig::from_toml("[calibration]\nmin_adjustment = 1.2\nmax_adjustment = 0.8")
            .unwrap();
    assert!(config.validate().is_err());

    let engine = CalibrationEngine::in_memory(&config);
    let signals = ClaimSignals::new(false, true, true);
    let evals: Vec<_> = (0..12)
        .map(|_| engine.evaluate(CLAIM, "agent-a", Some("rust"), signals, &[]))
        .collect();
    for (i, eval) in evals.iter().enumerate() {
        engine.record_outcome(eval, i % 3 == 0, "compile check").unwrap();
    }

    let stats = engine.statistics(Some("agent-a"), Some("rust"));
    assert_eq!(stats.total_records, 12);
    assert_eq!(stats.adjustment_factor, 1.0);

    let later = engine.evaluate(CLAIM, "agent-a", Some("rust"), signals, &[]);
    assert_eq!(later.response.calibration_adjustment, 1.0);
    assert_eq!(later.response.final_score, later.response.raw_score);
}

#[test]
fn open_refuses_unusable_adjustment_bounds() {
    let dir = tempdir().unwrap();
    let mut config = CandorConfig::default();
    config.storage.db_path = dir.path().join("calibration.db").display().to_string();
    config.calibration.min_adjustment = f64::NAN;

    let err = CalibrationEngine::open(&config).err().unwrap();
    assert!(matches!(err, CandorError::Config(_)));
    assert!(err.to_string().contains("calibration.min_adjustment"));
}

#[test]
fn evaluate_carries_risk_factors_into_the_decision() {
    let engine = CalibrationEngine::in_memory(&CandorConfig::default());
    let eval = engine.evaluate(
        CLAIM,
        "agent-a",
        Some("rust"),
        ClaimSignals::new(true, true, true),
        &["drops a table".to_string()],
    );
    assert!(eval.response.final_score >= 0.85);
    assert_eq!(eval.decision.tier, EscalationTier::ApprovalRequired);
    assert_eq!(eval.decision.final_score, eval.response.final_score);
    assert_eq!(engine.gate().pending().len(), 1);
}

#[test]
fn engine_opens_a_durable_store_from_config() {
    let dir = tempdir().unwrap();
    let mut config = CandorConfig::default();
    config.storage.db_path = dir.path().join("candor.db").to_string_lossy().into_owned();

    {
        let engine = CalibrationEngine::open(&config).unwrap();
        for _ in 0..3 {
            let eval = engine.evaluate(CLAIM, "agent-a", Some("rust"), ClaimSignals::default(), &[]);
            let decision = if eval.decision.is_terminal() {
                eval.decision.clone()
            } else {
                engine.gate().resolve(&eval.decision, true, "ok").unwrap()
            };
            let eval = candor_engine::Evaluation {
                decision,
                ..eval
            };
            engine.record_outcome(&eval, true, "check").unwrap();
        }
    }

    let engine = CalibrationEngine::open(&config).unwrap();
    assert_eq!(engine.store().count().unwrap(), 3);
    // Decisions are in-process; only calibration history persists.
    assert!(engine.gate().is_empty());
}

#[test]
fn concurrent_evaluations_and_outcomes() {
    let engine = Arc::new(CalibrationEngine::in_memory(&CandorConfig::default()));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let agent = format!("agent-{}", t % 2);
                for i in 0..10 {
                    let eval = engine.evaluate(
                        CLAIM,
                        &agent,
                        Some("rust"),
                        ClaimSignals::new(i % 2 == 0, true, true),
                        &[],
                    );
                    assert!((0.0..=1.0).contains(&eval.response.final_score));
                    if eval.decision.is_terminal() {
                        engine.record_outcome(&eval, true, "check").unwrap();
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let total = engine.store().count().unwrap();
    assert_eq!(engine.statistics(None, Some("rust")).total_records, total);
    assert_eq!(engine.gate().len(), 80);
}
