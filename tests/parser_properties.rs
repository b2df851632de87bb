//! Property tests for the parser's global laws.

use inventory_nlq::{parse_query, ParseResult};
use proptest::prelude::*;

/// Phrases of distinct entity types that never interact with each other,
/// in the order they are joined into a query.
const FRAGMENTS: &[&str] = &[
    "10k",
    "0805",
    "resistors",
    "from TDK",
    "with low stock",
    "in A1",
    "under $5",
];

fn query_from_mask(mask: u8) -> String {
    FRAGMENTS
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, f)| *f)
        .collect::<Vec<_>>()
        .join(" ")
}

fn assert_result_invariants(result: &ParseResult) -> Result<(), TestCaseError> {
    prop_assert!((0.0..=1.0).contains(&result.confidence));
    prop_assert_eq!(
        result.fallback_to_fts5,
        result.confidence < 0.5 || result.parsed_entities.is_empty()
    );
    prop_assert_eq!(result.intent.is_none(), result.parsed_entities.is_empty());
    if result.parsed_entities.is_empty() {
        prop_assert_eq!(result.confidence, 0.0);
    }
    Ok(())
}

/// Location phrases of each shape: bare code, named prefix and free word.
const LOCATIONS: &[&str] = &["in A1", "in drawer 3", "from bin-23", "stored in garage"];

// -- Strategy helpers --

fn arb_mask() -> impl Strategy<Value = u8> {
    0u8..(1 << FRAGMENTS.len())
}

/// Flip the case of ASCII letters according to `flips`.
fn recase(query: &str, flips: &[bool]) -> String {
    query
        .chars()
        .zip(flips.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn never_fails_on_arbitrary_text(query in any::<String>()) {
        let result = parse_query(&query);
        prop_assert_eq!(&result.query, &query);
        assert_result_invariants(&result)?;
    }

    #[test]
    fn never_fails_on_query_like_text(query in "[a-zA-Z0-9$.,\\- ]{0,64}") {
        assert_result_invariants(&parse_query(&query))?;
    }

    #[test]
    fn every_fragment_is_recognized(mask in arb_mask()) {
        let result = parse_query(&query_from_mask(mask));
        prop_assert_eq!(result.parsed_entities.len(), mask.count_ones() as usize);
        prop_assert!(result.error.is_none());
        assert_result_invariants(&result)?;
    }

    /// Adding an independently recognized entity never lowers confidence.
    #[test]
    fn confidence_monotonic_in_entities(mask in arb_mask(), extra in 0..FRAGMENTS.len()) {
        let smaller = parse_query(&query_from_mask(mask));
        let larger = parse_query(&query_from_mask(mask | (1 << extra)));
        prop_assert!(
            larger.confidence >= smaller.confidence,
            "{} -> {}",
            smaller.confidence,
            larger.confidence
        );
    }

    #[test]
    fn case_does_not_change_entities(
        mask in arb_mask(),
        flips in prop::collection::vec(any::<bool>(), 1..16),
    ) {
        let query = query_from_mask(mask);
        let baseline = parse_query(&query.to_lowercase());
        let recased = parse_query(&recase(&query, &flips));
        prop_assert_eq!(baseline.parsed_entities, recased.parsed_entities);
        prop_assert_eq!(baseline.confidence, recased.confidence);
    }

    #[test]
    fn case_does_not_change_locations(
        which in 0..LOCATIONS.len(),
        flips in prop::collection::vec(any::<bool>(), 1..16),
    ) {
        let query = format!("resistors {}", LOCATIONS[which]);
        let baseline = parse_query(&query.to_lowercase());
        let recased = parse_query(&recase(&query, &flips));
        prop_assert!(baseline.parsed_entities.location.is_some());
        prop_assert_eq!(baseline.parsed_entities, recased.parsed_entities);
        prop_assert_eq!(baseline.confidence, recased.confidence);
    }

    #[test]
    fn confidence_is_rounded(query in "[a-z0-9 $]{0,40}") {
        let confidence = parse_query(&query).confidence;
        prop_assert_eq!((confidence * 100.0).round() / 100.0, confidence);
    }
}
