use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Category of a signal contributing to a claim's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    /// Known fact vs inference vs an explicit "I don't know".
    SourceCertainty,
    /// The source was inspected recently.
    Recency,
    /// Explicit locators: line numbers, paths, symbols.
    Specificity,
    /// The claim can be mechanically verified.
    Verification,
    /// Primary vs secondary domain of the acting agent.
    DomainExpertise,
    /// Hedging phrases ("probably", "might", "I think").
    HedgingLanguage,
    /// Pattern-style identifiers and domain idioms.
    PatternReferences,
}

impl FactorCategory {
    pub const ALL: [FactorCategory; 7] = [
        Self::SourceCertainty,
        Self::Recency,
        Self::Specificity,
        Self::Verification,
        Self::DomainExpertise,
        Self::HedgingLanguage,
        Self::PatternReferences,
    ];

    /// Declared valid range (inclusive) for the summed impact of this category
    /// within one scoring call.
    pub fn impact_range(self) -> RangeInclusive<f64> {
        match self {
            Self::SourceCertainty => -0.50..=0.50,
            Self::Recency => 0.0..=0.20,
            Self::Specificity => 0.0..=0.60,
            Self::Verification => 0.0..=0.15,
            Self::DomainExpertise => -0.05..=0.15,
            Self::HedgingLanguage => -0.50..=0.0,
            Self::PatternReferences => 0.0..=0.20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceCertainty => "source_certainty",
            Self::Recency => "recency",
            Self::Specificity => "specificity",
            Self::Verification => "verification",
            Self::DomainExpertise => "domain_expertise",
            Self::HedgingLanguage => "hedging_language",
            Self::PatternReferences => "pattern_references",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored signal contributing to a claim's confidence.
///
/// Impacts are never clamped individually. An impact outside its category's
/// range is a caller error; only the total is clamped at scoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyFactor {
    pub category: FactorCategory,
    /// Human-readable justification, e.g. "exact line number cited".
    pub description: String,
    /// Signed contribution to the raw score.
    pub impact: f64,
}

impl UncertaintyFactor {
    pub fn new(category: FactorCategory, description: impl Into<String>, impact: f64) -> Self {
        Self {
            category,
            description: description.into(),
            impact,
        }
    }

    /// Whether this impact, on its own, fits the category's declared range.
    pub fn is_within_range(&self) -> bool {
        self.category.impact_range().contains(&self.impact)
    }
}
