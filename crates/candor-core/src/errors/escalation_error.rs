use crate::models::DecisionStatus;

/// Errors raised by the escalation decision lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum EscalationError {
    /// A terminal decision was resolved a second time.
    #[error("decision {decision_id} already resolved as {status}")]
    AlreadyResolved {
        decision_id: String,
        status: DecisionStatus,
    },

    #[error("decision {decision_id} was not issued by this gate")]
    UnknownDecision { decision_id: String },

    /// An outcome or override was attached to a decision still pending.
    #[error("decision {decision_id} is still pending")]
    NotResolved { decision_id: String },

    #[error("decision {decision_id} cannot be overridden: {reason}")]
    NotOverridable { decision_id: String, reason: String },
}
