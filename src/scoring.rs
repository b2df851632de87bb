//! Confidence scoring and the full-text fallback decision
//!
//! Confidence blends two signals:
//!
//! - **Entity score**: `1 − Π(1 − w_t · c_t)` over the merged entities,
//!   where `w_t` is the weight of the entity type and `c_t` the local
//!   confidence of the accepted match. Each extra entity can only raise it.
//! - **Coverage**: fraction of content tokens (tokens that are not filler
//!   words) touched by an accepted match.
//!
//! `confidence = round2(clamp(ENTITY_WEIGHT · entity + COVERAGE_WEIGHT · coverage))`,
//! and a query with no entities scores exactly 0.

use nlq_types::EntityType;
use serde::Serialize;

use crate::lexicon::Lexicon;
use crate::normalize::NormalizedQuery;
use crate::recognizers::EntityMatch;

// ---------------------------------------------------------------------------
// Scoring Constants
// ---------------------------------------------------------------------------

pub const ENTITY_WEIGHT: f64 = 0.6;
pub const COVERAGE_WEIGHT: f64 = 0.4;

/// Primary search dimensions.
pub const COMPONENT_TYPE_WEIGHT: f64 = 0.6;
pub const STOCK_STATUS_WEIGHT: f64 = 0.5;
pub const LOCATION_WEIGHT: f64 = 0.5;

/// Any value/unit type (resistance, capacitance, ...).
pub const VALUE_UNIT_WEIGHT: f64 = 0.45;

/// Secondary qualifiers.
pub const PACKAGE_WEIGHT: f64 = 0.3;
pub const MANUFACTURER_WEIGHT: f64 = 0.3;
pub const PRICE_WEIGHT: f64 = 0.25;

pub fn type_weight(entity_type: EntityType) -> f64 {
    match entity_type {
        EntityType::ComponentType => COMPONENT_TYPE_WEIGHT,
        EntityType::StockStatus => STOCK_STATUS_WEIGHT,
        EntityType::Location => LOCATION_WEIGHT,
        EntityType::Resistance
        | EntityType::Capacitance
        | EntityType::Voltage
        | EntityType::Inductance
        | EntityType::Current
        | EntityType::Frequency => VALUE_UNIT_WEIGHT,
        EntityType::Package => PACKAGE_WEIGHT,
        EntityType::Manufacturer => MANUFACTURER_WEIGHT,
        EntityType::Price => PRICE_WEIGHT,
    }
}

// ---------------------------------------------------------------------------
// Scoring Functions
// ---------------------------------------------------------------------------

/// The components of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ConfidenceBreakdown {
    pub entity_score: f64,
    pub coverage: f64,
    pub confidence: f64,
}

/// Noisy-OR over accepted matches (one per type after merging).
pub fn entity_score(accepted: &[EntityMatch]) -> f64 {
    let miss: f64 = accepted
        .iter()
        .map(|m| 1.0 - type_weight(m.entity_type) * m.confidence)
        .product();
    (1.0 - miss).clamp(0.0, 1.0)
}

/// Fraction of content tokens overlapped by an accepted span.
pub fn coverage(query: &NormalizedQuery, accepted: &[EntityMatch], lexicon: &Lexicon) -> f64 {
    if accepted.is_empty() {
        return 0.0;
    }

    let mut content = 0usize;
    let mut consumed = 0usize;
    for token in query.tokens() {
        if lexicon.is_filler(&token.text) {
            continue;
        }
        content += 1;
        if accepted
            .iter()
            .any(|m| m.span.start < token.end && token.start < m.span.end)
        {
            consumed += 1;
        }
    }

    if content == 0 {
        // Every word was filler, yet something matched
        return 1.0;
    }
    consumed as f64 / content as f64
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn score(
    query: &NormalizedQuery,
    accepted: &[EntityMatch],
    lexicon: &Lexicon,
) -> ConfidenceBreakdown {
    if accepted.is_empty() {
        return ConfidenceBreakdown::default();
    }

    let entity_score = entity_score(accepted);
    let coverage = coverage(query, accepted, lexicon);
    let raw = ENTITY_WEIGHT * entity_score + COVERAGE_WEIGHT * coverage;

    ConfidenceBreakdown {
        entity_score,
        coverage,
        confidence: round2(raw.clamp(0.0, 1.0)),
    }
}

// ---------------------------------------------------------------------------
// Fallback Decision
// ---------------------------------------------------------------------------

/// Whether the caller should prefer full-text search.
///
/// True when confidence is under the threshold, when nothing was
/// recognized, or when recognition failed.
pub fn should_fallback(confidence: f64, has_entities: bool, low_threshold: f64, failed: bool) -> bool {
    failed || !has_entities || confidence < low_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{compile, LexiconConfig};
    use crate::normalize::normalize_query;
    use crate::recognizers::Span;
    use nlq_types::EntityValue;

    fn m(ty: EntityType, start: usize, end: usize, conf: f64) -> EntityMatch {
        EntityMatch::new(ty, EntityValue::text("x"), Span::new(start, end), conf)
    }

    #[test]
    fn test_entity_score_noisy_or() {
        assert_eq!(entity_score(&[]), 0.0);
        let one = entity_score(&[m(EntityType::ComponentType, 0, 1, 1.0)]);
        assert!((one - COMPONENT_TYPE_WEIGHT).abs() < 1e-9);

        let two = entity_score(&[
            m(EntityType::ComponentType, 0, 1, 1.0),
            m(EntityType::Price, 2, 3, 1.0),
        ]);
        let expected = 1.0 - (1.0 - COMPONENT_TYPE_WEIGHT) * (1.0 - PRICE_WEIGHT);
        assert!((two - expected).abs() < 1e-9);
        assert!(two > one);
    }

    #[test]
    fn test_primary_types_outweigh_qualifiers() {
        for qualifier in [EntityType::Package, EntityType::Manufacturer, EntityType::Price] {
            assert!(type_weight(EntityType::ComponentType) > type_weight(qualifier));
            assert!(type_weight(EntityType::StockStatus) > type_weight(qualifier));
        }
    }

    #[test]
    fn test_coverage_ignores_filler() {
        let lexicon = compile(&LexiconConfig::default()).unwrap();
        // "show me resistors please": only "resistors" is content
        let query = normalize_query("show me resistors please");
        let accepted = [m(EntityType::ComponentType, 8, 17, 0.95)];
        assert_eq!(coverage(&query, &accepted, &lexicon), 1.0);

        // "resistors blue": half the content is unexplained
        let query = normalize_query("resistors blue");
        let accepted = [m(EntityType::ComponentType, 0, 9, 0.95)];
        assert_eq!(coverage(&query, &accepted, &lexicon), 0.5);
    }

    #[test]
    fn test_score_without_entities_is_zero() {
        let lexicon = compile(&LexiconConfig::default()).unwrap();
        let query = normalize_query("show me stuff");
        assert_eq!(score(&query, &[], &lexicon), ConfidenceBreakdown::default());
    }

    #[test]
    fn test_score_rounded_and_bounded() {
        let lexicon = compile(&LexiconConfig::default()).unwrap();
        let query = normalize_query("resistors");
        let breakdown = score(&query, &[m(EntityType::ComponentType, 0, 9, 0.95)], &lexicon);
        // 0.6 * 0.57 + 0.4 * 1.0
        assert_eq!(breakdown.confidence, 0.74);
        assert!(breakdown.confidence <= 1.0);
    }

    #[test]
    fn test_fallback_rule() {
        assert!(should_fallback(0.49, true, 0.5, false));
        assert!(!should_fallback(0.5, true, 0.5, false));
        assert!(should_fallback(0.9, false, 0.5, false));
        assert!(should_fallback(0.9, true, 0.5, true));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.934), 0.93);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(1.0), 1.0);
    }
}
