//! Raw query layer over a migrated connection.

use candor_storage::connection::pragmas;
use candor_storage::migrations::{current_version, run_migrations};
use candor_storage::queries::calibration_records::{self, CalibrationRow};
use rusqlite::Connection;

fn migrated() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    pragmas::apply_pragmas(&conn).unwrap();
    run_migrations(&conn).unwrap();
    conn
}

fn row(id: &str, agent: &str, domain: Option<&str>, claimed: f64, correct: bool) -> CalibrationRow {
    CalibrationRow {
        id: id.to_string(),
        claimed_confidence: claimed,
        actual_correct: correct,
        claim_text: format!("claim {id}"),
        task_description: "task".to_string(),
        agent_name: agent.to_string(),
        domain: domain.map(str::to_string),
        factors_json: r#"{"specificity":0.2}"#.to_string(),
        recorded_at: "2026-01-01T00:00:00+00:00".to_string(),
    }
}

#[test]
fn migrations_are_idempotent() {
    let conn = migrated();
    let v = current_version(&conn).unwrap();
    assert!(v >= 1);
    run_migrations(&conn).unwrap();
    assert_eq!(current_version(&conn).unwrap(), v);
}

#[test]
fn insert_then_get() {
    let conn = migrated();
    calibration_records::insert(&conn, &row("r1", "a", Some("rust"), 0.8, true)).unwrap();

    let got = calibration_records::get(&conn, "r1").unwrap().unwrap();
    assert_eq!(got.agent_name, "a");
    assert_eq!(got.domain.as_deref(), Some("rust"));
    assert!(got.actual_correct);
    assert_eq!(got.factors_json, r#"{"specificity":0.2}"#);
    assert!(calibration_records::get(&conn, "missing").unwrap().is_none());
}

#[test]
fn duplicate_id_is_rejected() {
    let conn = migrated();
    calibration_records::insert(&conn, &row("r1", "a", None, 0.5, true)).unwrap();
    assert!(calibration_records::insert(&conn, &row("r1", "a", None, 0.5, true)).is_err());
    assert_eq!(calibration_records::count(&conn).unwrap(), 1);
}

#[test]
fn scan_filters_by_scope() {
    let conn = migrated();
    calibration_records::insert(&conn, &row("1", "a", Some("rust"), 0.9, true)).unwrap();
    calibration_records::insert(&conn, &row("2", "a", Some("go"), 0.7, false)).unwrap();
    calibration_records::insert(&conn, &row("3", "b", Some("rust"), 0.6, true)).unwrap();
    calibration_records::insert(&conn, &row("4", "b", None, 0.4, false)).unwrap();

    let scan = |a: Option<&str>, d: Option<&str>| calibration_records::scan_observations(&conn, a, d).unwrap().len();
    assert_eq!(scan(None, None), 4);
    assert_eq!(scan(Some("a"), None), 2);
    assert_eq!(scan(None, Some("rust")), 2);
    assert_eq!(scan(Some("b"), Some("rust")), 1);
    assert_eq!(scan(Some("c"), None), 0);
}

#[test]
fn undecodable_row_is_returned_as_err() {
    let conn = migrated();
    calibration_records::insert(&conn, &row("ok", "a", None, 0.9, true)).unwrap();
    // A non-numeric claim cannot enter a STRICT REAL column, so drop STRICT
    // by recreating the table without it for this one check.
    conn.execute_batch(
        "ALTER TABLE calibration_records RENAME TO old_records;
         CREATE TABLE calibration_records AS SELECT * FROM old_records;
         INSERT INTO calibration_records
            (id, claimed_confidence, actual_correct, claim_text, task_description,
             agent_name, domain, factors_json, recorded_at)
         VALUES ('bad', 'not-a-number', 1, '', '', 'a', NULL, '{}', '');",
    )
    .unwrap();

    let rows = calibration_records::scan_observations(&conn, Some("a"), None).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().filter(|r| r.is_err()).count(), 1);
}
