//! Manufacturer recognizer: alias table lookup.

use nlq_types::{EntityType, EntityValue};

use super::{EntityMatch, RecognizerContext, Span};
use crate::normalize::{normalize_phrase, NormalizedQuery};

pub const FULL_NAME_CONFIDENCE: f64 = 0.95;
pub const ALIAS_CONFIDENCE: f64 = 0.9;
/// Two- and three-letter abbreviations ("ti", "st", "adi")
pub const ABBREVIATION_CONFIDENCE: f64 = 0.8;

pub fn recognize(query: &NormalizedQuery, ctx: &RecognizerContext<'_>) -> Vec<EntityMatch> {
    let tokens = query.tokens();
    ctx.lexicon
        .manufacturers
        .scan(tokens)
        .into_iter()
        .map(|hit| {
            let entry = hit.entry;
            let confidence = if entry.phrase == normalize_phrase(&entry.canonical) {
                FULL_NAME_CONFIDENCE
            } else if entry.phrase.chars().count() <= 3 {
                ABBREVIATION_CONFIDENCE
            } else {
                ALIAS_CONFIDENCE
            };
            EntityMatch::new(
                EntityType::Manufacturer,
                EntityValue::text(entry.canonical.clone()),
                Span::of_tokens(&tokens[hit.first], &tokens[hit.last]),
                confidence,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizers::test_support::{run, values};
    use crate::recognizers::Recognizer;

    #[test]
    fn test_abbreviation_maps_to_display_name() {
        let matches = run(Recognizer::Manufacturer, "TI op amps");
        assert_eq!(values(&matches), vec!["Texas Instruments"]);
        assert_eq!(matches[0].confidence, ABBREVIATION_CONFIDENCE);
    }

    #[test]
    fn test_full_name() {
        let matches = run(Recognizer::Manufacturer, "parts from Texas Instruments");
        assert_eq!(values(&matches), vec!["Texas Instruments"]);
        assert_eq!(matches[0].confidence, FULL_NAME_CONFIDENCE);
    }

    #[test]
    fn test_multi_word_alias() {
        let matches = run(Recognizer::Manufacturer, "On Semi mosfets");
        assert_eq!(values(&matches), vec!["onsemi"]);
        assert_eq!(matches[0].confidence, ALIAS_CONFIDENCE);
    }

    #[test]
    fn test_accented_and_plain_spelling() {
        assert_eq!(
            values(&run(Recognizer::Manufacturer, "Würth inductors")),
            vec!["Würth Elektronik"]
        );
        assert_eq!(
            values(&run(Recognizer::Manufacturer, "wurth inductors")),
            vec!["Würth Elektronik"]
        );
    }
}
