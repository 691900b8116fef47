//! ConfidenceScorer: multi-factor confidence with calibration feedback.

pub mod extractors;

use std::sync::Arc;

use candor_core::config::ScoringConfig;
use candor_core::models::{ConfidenceResponse, FactorCategory, UncertaintyFactor};
use candor_core::traits::{ICalibrationStore, IFactorExtractor};
use serde::{Deserialize, Serialize};

use self::extractors::HeuristicExtractor;

const RECENCY_IMPACT: f64 = 0.20;
const VERIFICATION_IMPACT: f64 = 0.15;
const PRIMARY_DOMAIN_IMPACT: f64 = 0.15;
const SECONDARY_DOMAIN_IMPACT: f64 = -0.05;

/// Contextual signals supplied by the claim producer alongside the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSignals {
    /// The agent inspected the relevant source recently.
    pub recently_inspected: bool,
    /// The claim can be checked mechanically (file exists, test runs).
    pub can_verify: bool,
    /// The domain is the agent's primary expertise.
    pub is_primary_domain: bool,
}

impl ClaimSignals {
    pub fn new(recently_inspected: bool, can_verify: bool, is_primary_domain: bool) -> Self {
        Self {
            recently_inspected,
            can_verify,
            is_primary_domain,
        }
    }
}

/// Scores claims. Read-only against the calibration store; safe to share
/// across threads.
pub struct ConfidenceScorer {
    config: ScoringConfig,
    extractor: Box<dyn IFactorExtractor>,
    store: Option<Arc<dyn ICalibrationStore>>,
}

impl ConfidenceScorer {
    /// A scorer with the heuristic extractor and no calibration history.
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            extractor: Box::new(HeuristicExtractor::new()),
            store: None,
        }
    }

    /// Attach a calibration store used to scale raw scores.
    pub fn with_store(mut self, store: Arc<dyn ICalibrationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the text factor strategy.
    pub fn with_extractor(mut self, extractor: impl IFactorExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one claim. Never fails: out-of-range inputs are clamped at the
    /// total, and calibration problems fall back to an adjustment of 1.0.
    pub fn score(
        &self,
        claim_text: &str,
        agent_name: &str,
        domain: Option<&str>,
        signals: ClaimSignals,
    ) -> ConfidenceResponse {
        let _span = candor_core::scoring_span!(agent_name, domain).entered();

        let mut factors: Vec<UncertaintyFactor> = self
            .extractor
            .extract(claim_text, domain)
            .into_iter()
            .filter(|f| {
                if f.impact.is_finite() {
                    true
                } else {
                    tracing::warn!(
                        extractor = self.extractor.name(),
                        category = %f.category,
                        "dropping factor with non-finite impact"
                    );
                    false
                }
            })
            .collect();
        factors.extend(signal_factors(domain, signals));

        let adjustment = self.calibration_adjustment(agent_name, domain, &mut factors);
        warn_out_of_range(&factors);

        let response = ConfidenceResponse::compute(
            claim_text,
            agent_name,
            domain.map(str::to_string),
            factors,
            adjustment,
            self.config.verification_threshold,
        );

        tracing::debug!(
            raw = response.raw_score,
            adjustment = response.calibration_adjustment,
            final_score = response.final_score,
            level = response.confidence_level.as_str(),
            verification_needed = response.verification_needed,
            "scored claim"
        );
        response
    }

    /// Score with no domain and every contextual signal off.
    pub fn score_simple(&self, claim_text: &str, agent_name: &str) -> ConfidenceResponse {
        self.score(claim_text, agent_name, None, ClaimSignals::default())
    }

    fn calibration_adjustment(
        &self,
        agent_name: &str,
        domain: Option<&str>,
        factors: &mut Vec<UncertaintyFactor>,
    ) -> f64 {
        let Some(store) = &self.store else {
            factors.push(no_calibration("no calibration store attached"));
            return 1.0;
        };

        match store.try_statistics(Some(agent_name), domain) {
            Ok(stats) => stats.adjustment_factor,
            Err(e) => {
                tracing::warn!(
                    agent = agent_name,
                    domain = ?domain,
                    error = %e,
                    "calibration unavailable, scoring uncalibrated"
                );
                factors.push(no_calibration(&format!("calibration unavailable: {e}")));
                1.0
            }
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

fn signal_factors(domain: Option<&str>, signals: ClaimSignals) -> Vec<UncertaintyFactor> {
    let mut factors = Vec::new();
    if signals.recently_inspected {
        factors.push(UncertaintyFactor::new(
            FactorCategory::Recency,
            "recently inspected the relevant source",
            RECENCY_IMPACT,
        ));
    }
    if signals.can_verify {
        factors.push(UncertaintyFactor::new(
            FactorCategory::Verification,
            "claim can be verified",
            VERIFICATION_IMPACT,
        ));
    }
    if signals.is_primary_domain {
        factors.push(UncertaintyFactor::new(
            FactorCategory::DomainExpertise,
            "agent's primary domain",
            PRIMARY_DOMAIN_IMPACT,
        ));
    } else if let Some(domain) = domain {
        factors.push(UncertaintyFactor::new(
            FactorCategory::DomainExpertise,
            format!("secondary domain: {domain}"),
            SECONDARY_DOMAIN_IMPACT,
        ));
    }
    factors
}

/// Zero-impact entry documenting that the score was not calibrated.
fn no_calibration(reason: &str) -> UncertaintyFactor {
    UncertaintyFactor::new(
        FactorCategory::SourceCertainty,
        format!("no calibration applied ({reason})"),
        0.0,
    )
}

fn warn_out_of_range(factors: &[UncertaintyFactor]) {
    for category in FactorCategory::ALL {
        let total: f64 = factors
            .iter()
            .filter(|f| f.category == category)
            .map(|f| f.impact)
            .sum();
        if !category.impact_range().contains(&total) {
            tracing::warn!(
                category = %category,
                total,
                "category impact outside its declared range"
            );
        }
    }
}
