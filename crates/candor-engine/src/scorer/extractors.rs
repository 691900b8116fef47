//! Heuristic factor extraction from claim text: hedging phrases, locators,
//! pattern identifiers, domain idioms, and explicit non-answers.

use std::sync::LazyLock;

use candor_core::models::{FactorCategory, UncertaintyFactor};
use candor_core::traits::IFactorExtractor;
use regex::Regex;

// Per-hit impacts in tenths, so capped totals land exactly on range bounds.
const HEDGE_TENTHS: usize = 1;
const HEDGE_CAP: usize = 5;
const LOCATOR_TENTHS: usize = 2;
const LOCATOR_CAP: usize = 3;
const PATTERN_TENTHS: usize = 1;
const PATTERN_CAP: usize = 2;
const IDK_IMPACT: f64 = -0.30;
const EVIDENCE_IMPACT: f64 = 0.10;

/// Hedging phrases. Every occurrence outside a non-answer counts.
static HEDGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(probably|might|maybe|i think|i believe|not sure|unsure|unclear|possibly|perhaps|could be|seems like|appears to|assuming|if this is correct|if i understand|guessing|around|approximately|roughly)\b",
    )
    .unwrap()
});

/// Explicit non-answers.
static IDK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(i don'?t know|i'?m not sure|unable to determine|cannot assess|insufficient information|need more context)\b",
    )
    .unwrap()
});

/// Language asserting the claim was checked against the source.
static EVIDENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(verified|confirmed|file exists|function defined)\b").unwrap()
});

/// `Pattern-XXX` / `SOP-XXX` identifiers.
static PATTERN_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(pattern|sop)-[a-z0-9][a-z0-9-]*").unwrap());

/// Locator kinds. Each kind counts once no matter how often it appears.
static LOCATOR_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("line number", r"(?i)\bline[:\s]+\d+|\.[a-z]{1,4}:\d+"),
        ("file path", r"(?i)\b[\w\-./]+\.(rs|ts|tsx|js|py|go|java|md|toml|json|yaml|yml)\b"),
        ("source directory", r"(?i)\b(src|crates|lib|packages)/"),
        ("symbol", r"(?i)\b(fn|function|struct|class|method|trait|impl)\s+[a-z_][\w]*|\b\w+::\w+"),
        ("commit", r"(?i)\bcommit[:\s]+[0-9a-f]{7,40}\b"),
        ("test evidence", r"(?i)\b(tests? pass(es|ed)?|benchmark:|cargo (check|test))"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).unwrap()))
    .collect()
});

/// Code idioms that signal fluency in a domain.
const DOMAIN_IDIOMS: &[(&str, &str)] = &[
    ("rust", "impl "),
    ("rust", "fn "),
    ("rust", "pub mod"),
    ("rust", "use crate::"),
    ("typescript", "interface "),
    ("typescript", "export "),
    ("typescript", "async "),
    ("typescript", "import {"),
];

fn tenths(n: usize) -> f64 {
    n as f64 / 10.0
}

/// Whether the text is an explicit "I don't know".
pub fn is_idk_response(text: &str) -> bool {
    IDK_RE.is_match(text)
}

/// Default text strategy. Emits at most one factor per category, each inside
/// its declared range.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Hedges inside an explicit non-answer are left to `source_certainty`.
    fn hedging(text: &str) -> Option<UncertaintyFactor> {
        let idk_spans: Vec<_> = IDK_RE.find_iter(text).map(|m| m.range()).collect();
        let count = HEDGE_RE
            .find_iter(text)
            .filter(|m| {
                !idk_spans
                    .iter()
                    .any(|idk| m.start() < idk.end && idk.start < m.end())
            })
            .count();
        if count == 0 {
            return None;
        }
        Some(UncertaintyFactor::new(
            FactorCategory::HedgingLanguage,
            format!("{count} hedging phrase(s)"),
            -tenths(HEDGE_TENTHS * count.min(HEDGE_CAP)),
        ))
    }

    fn specificity(text: &str) -> Option<UncertaintyFactor> {
        let kinds: Vec<&str> = LOCATOR_RES
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(kind, _)| *kind)
            .collect();
        if kinds.is_empty() {
            return None;
        }
        let counted = kinds.len().min(LOCATOR_CAP);
        Some(UncertaintyFactor::new(
            FactorCategory::Specificity,
            format!("explicit locators: {}", kinds.join(", ")),
            tenths(LOCATOR_TENTHS * counted),
        ))
    }

    fn pattern_references(text: &str, domain: Option<&str>) -> Option<UncertaintyFactor> {
        let ids = PATTERN_ID_RE.find_iter(text).count();
        let idioms = domain.map_or(0, |domain| {
            let lower = text.to_lowercase();
            let domain = domain.to_lowercase();
            DOMAIN_IDIOMS
                .iter()
                .filter(|(d, idiom)| *d == domain && lower.contains(idiom))
                .count()
        });
        let count = ids + idioms;
        if count == 0 {
            return None;
        }
        Some(UncertaintyFactor::new(
            FactorCategory::PatternReferences,
            format!("{ids} pattern identifier(s), {idioms} domain idiom(s)"),
            tenths(PATTERN_TENTHS * count.min(PATTERN_CAP)),
        ))
    }

    fn source_certainty(text: &str) -> Vec<UncertaintyFactor> {
        let mut factors = Vec::new();
        if is_idk_response(text) {
            factors.push(UncertaintyFactor::new(
                FactorCategory::SourceCertainty,
                "explicit \"I don't know\"",
                IDK_IMPACT,
            ));
        }
        if EVIDENCE_RE.is_match(text) {
            factors.push(UncertaintyFactor::new(
                FactorCategory::SourceCertainty,
                "claim states it was checked",
                EVIDENCE_IMPACT,
            ));
        }
        factors
    }
}

impl IFactorExtractor for HeuristicExtractor {
    fn extract(&self, claim_text: &str, domain: Option<&str>) -> Vec<UncertaintyFactor> {
        let mut factors: Vec<UncertaintyFactor> = [
            Self::hedging(claim_text),
            Self::specificity(claim_text),
            Self::pattern_references(claim_text, domain),
        ]
        .into_iter()
        .flatten()
        .collect();
        factors.extend(Self::source_certainty(claim_text));
        factors
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
