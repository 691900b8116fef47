use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discrete trust level, declared in order of decreasing trust.
///
/// The derived `Ord` therefore grows with strictness: `Autonomous` is the
/// least strict tier and `Blocked` the most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscalationTier {
    /// Proceeds without review.
    Autonomous,
    /// Proceeds as a non-blocking suggestion awaiting acknowledgement.
    Suggest,
    /// Needs an explicit human approval.
    ApprovalRequired,
    /// Never proceeds on this engine's authority.
    Blocked,
}

impl EscalationTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Autonomous => "AUTONOMOUS",
            Self::Suggest => "SUGGEST",
            Self::ApprovalRequired => "APPROVAL_REQUIRED",
            Self::Blocked => "BLOCKED",
        }
    }

    /// Whether a decision at this tier waits for an external `resolve`.
    pub fn requires_resolution(self) -> bool {
        matches!(self, Self::Suggest | Self::ApprovalRequired)
    }

    /// The stricter of two tiers. Used to apply floors without ever upgrading.
    pub fn at_least(self, floor: EscalationTier) -> EscalationTier {
        self.max(floor)
    }
}

impl fmt::Display for EscalationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a decision: `Pending` then exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    Pending,
    Approved,
    Rejected,
}

impl DecisionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn from_approved(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Rejected
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        })
    }
}

/// One decision record. An audit record: after its single terminal write it
/// is never changed. Overrides are new records pointing at the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationDecision {
    pub id: String,
    pub tier: EscalationTier,
    /// The final score that produced the tier.
    pub final_score: f64,
    /// Declared risks that forced a stricter floor tier.
    pub risk_factors: Vec<String>,
    pub status: DecisionStatus,
    pub rationale: String,
    pub created_at: DateTime<Utc>,
    /// Set by the terminal write.
    pub decided_at: Option<DateTime<Utc>>,
    /// Id of the decision this record overrides, if it is an override.
    pub overrides: Option<String>,
}

impl EscalationDecision {
    /// A fresh `Pending` decision.
    pub fn pending(
        tier: EscalationTier,
        final_score: f64,
        risk_factors: Vec<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tier,
            final_score,
            risk_factors,
            status: DecisionStatus::Pending,
            rationale: rationale.into(),
            created_at: Utc::now(),
            decided_at: None,
            overrides: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// `Some(true/false)` once terminal, `None` while pending.
    pub fn approved(&self) -> Option<bool> {
        match self.status {
            DecisionStatus::Pending => None,
            DecisionStatus::Approved => Some(true),
            DecisionStatus::Rejected => Some(false),
        }
    }

    pub fn is_override(&self) -> bool {
        self.overrides.is_some()
    }
}
