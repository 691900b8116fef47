//! v001: calibration_records with a scope index for agent/domain range scans.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS calibration_records (
    id                  TEXT PRIMARY KEY,
    claimed_confidence  REAL NOT NULL,
    actual_correct      INTEGER NOT NULL,
    claim_text          TEXT NOT NULL,
    task_description    TEXT NOT NULL,
    agent_name          TEXT NOT NULL,
    domain              TEXT,
    factors_json        TEXT NOT NULL DEFAULT '{}',
    recorded_at         TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_calibration_scope
    ON calibration_records(agent_name, domain, recorded_at);
CREATE INDEX IF NOT EXISTS idx_calibration_domain
    ON calibration_records(domain);
";
