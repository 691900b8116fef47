use crate::models::UncertaintyFactor;

/// Strategy deriving factors from the text of a claim.
///
/// Must be pure: identical input, identical factors. Implementations keep
/// each category's summed impact inside its declared range.
pub trait IFactorExtractor: Send + Sync {
    fn extract(&self, claim_text: &str, domain: Option<&str>) -> Vec<UncertaintyFactor>;

    /// Identifier used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> IFactorExtractor for F
where
    F: Fn(&str, Option<&str>) -> Vec<UncertaintyFactor> + Send + Sync,
{
    fn extract(&self, claim_text: &str, domain: Option<&str>) -> Vec<UncertaintyFactor> {
        self(claim_text, domain)
    }
}
