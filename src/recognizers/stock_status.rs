//! Stock status recognizer: phrase-list matching.

use nlq_types::{EntityType, EntityValue};

use super::{EntityMatch, RecognizerContext, Span};
use crate::normalize::NormalizedQuery;

/// Multi-word phrases ("low stock") are unambiguous
pub const PHRASE_CONFIDENCE: f64 = 0.95;
/// Single words ("empty", "available") may mean something else
pub const WORD_CONFIDENCE: f64 = 0.8;

pub fn recognize(query: &NormalizedQuery, ctx: &RecognizerContext<'_>) -> Vec<EntityMatch> {
    let tokens = query.tokens();
    ctx.lexicon
        .stock_status
        .scan(tokens)
        .into_iter()
        .map(|hit| {
            let confidence = if hit.entry.tokens > 1 {
                PHRASE_CONFIDENCE
            } else {
                WORD_CONFIDENCE
            };
            EntityMatch::new(
                EntityType::StockStatus,
                EntityValue::Stock(hit.entry.canonical),
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
    fn test_canonical_phrases() {
        for (query, expected) in [
            ("resistors with low stock", "low"),
            ("parts running low", "low"),
            ("what is out of stock", "out_of_stock"),
            ("empty bins", "out_of_stock"),
            ("caps in stock", "available"),
            ("brand new chips", "unused"),
            ("things that need reorder", "needs_reorder"),
        ] {
            let matches = run(Recognizer::StockStatus, query);
            assert!(
                values(&matches).contains(&expected.to_string()),
                "{query}: {:?}",
                values(&matches)
            );
        }
    }

    #[test]
    fn test_bare_low_is_not_stock() {
        assert!(run(Recognizer::StockStatus, "low cost resistors").is_empty());
    }

    #[test]
    fn test_phrase_beats_word() {
        let matches = run(Recognizer::StockStatus, "need to reorder");
        let best = matches
            .iter()
            .max_by(|a, b| {
                a.confidence
                    .total_cmp(&b.confidence)
                    .then(a.span.len().cmp(&b.span.len()))
            })
            .unwrap();
        assert_eq!(best.confidence, PHRASE_CONFIDENCE);
        assert_eq!(best.span, Span::new(0, 15));
    }
}
