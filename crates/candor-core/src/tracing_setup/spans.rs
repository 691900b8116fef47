//! Span definitions per operation: scoring, calibration, escalation.

/// Create a scoring span.
#[macro_export]
macro_rules! scoring_span {
    ($agent:expr, $domain:expr) => {
        tracing::debug_span!("candor.scoring", agent = %$agent, domain = ?$domain)
    };
}

/// Create a calibration statistics span.
#[macro_export]
macro_rules! calibration_span {
    ($agent:expr, $domain:expr) => {
        tracing::debug_span!("candor.calibration", agent = ?$agent, domain = ?$domain)
    };
}

/// Create an escalation span.
#[macro_export]
macro_rules! escalation_span {
    ($final_score:expr) => {
        tracing::info_span!("candor.escalation", final_score = $final_score)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SCORING: &str = "candor.scoring";
    pub const CALIBRATION: &str = "candor.calibration";
    pub const ESCALATION: &str = "candor.escalation";
}
