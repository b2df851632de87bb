//! Location recognizer
//!
//! Three sub-patterns:
//! 1. Bare code: one letter plus up to three digits (`a1` → `A1`)
//! 2. Named prefix: a storage word plus a code (`bin-23`, `drawer b2`),
//!    reported as the lowercase word and the uppercased code (`drawer B2`)
//! 3. Prepositional phrase: `in|at|from|inside X`, optionally led by
//!    `stored|located|kept`. A code X is reported as the code; a plain
//!    word X is reported in lowercase, with low confidence
//!
//! Values are built from the normalized text, so the caller's casing never
//! changes them.
//!
//! A plain word never becomes a location when the lexicon owns it, so
//! "in stock" or "at least" stay with their own recognizers.

use std::sync::LazyLock;

use nlq_types::{EntityType, EntityValue};
use regex::Regex;

use super::{EntityMatch, RecognizerContext, Span};
use crate::normalize::NormalizedQuery;

pub const PREPOSITIONAL_CODE_CONFIDENCE: f64 = 0.95;
pub const NAMED_PREFIX_CONFIDENCE: f64 = 0.9;
pub const BARE_CODE_CONFIDENCE: f64 = 0.85;
pub const FREE_WORD_CONFIDENCE: f64 = 0.6;

const PREPOSITIONS: &[&str] = &["in", "at", "from", "inside"];

/// Verbs that may precede the preposition ("stored in", "kept at")
pub const LEAD_IN_WORDS: &[&str] = &["stored", "located", "kept"];

const DETERMINERS: &[&str] = &["the", "my", "our", "a"];

static BARE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-z])([0-9]{1,3})\b").unwrap());

/// A code found in the text, before prepositional handling.
struct CodeMatch {
    span: Span,
    value: String,
    confidence: f64,
}

pub fn recognize(query: &NormalizedQuery, ctx: &RecognizerContext<'_>) -> Vec<EntityMatch> {
    let text = query.text();
    let mut codes: Vec<CodeMatch> = Vec::new();

    for caps in BARE_CODE.captures_iter(text) {
        let (Some(whole), Some(letter), Some(digits)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        codes.push(CodeMatch {
            span: Span::new(whole.start(), whole.end()),
            value: format!("{}{}", letter.as_str().to_ascii_uppercase(), digits.as_str()),
            confidence: BARE_CODE_CONFIDENCE,
        });
    }

    if let Some(prefix) = &ctx.lexicon.location_prefix {
        for caps in prefix.captures_iter(text) {
            let (Some(whole), Some(word)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let code = &text[word.end()..whole.end()];
            let value = format!("{}{}", word.as_str(), code.to_ascii_uppercase());
            codes.push(CodeMatch {
                span: Span::new(whole.start(), whole.end()),
                value,
                confidence: NAMED_PREFIX_CONFIDENCE,
            });
        }
    }

    let mut matches: Vec<EntityMatch> = codes
        .iter()
        .map(|c| location_match(c.value.clone(), c.span, c.confidence))
        .collect();
    matches.extend(prepositional(query, ctx, &codes));
    matches
}

fn prepositional(
    query: &NormalizedQuery,
    ctx: &RecognizerContext<'_>,
    codes: &[CodeMatch],
) -> Vec<EntityMatch> {
    let tokens = query.tokens();
    let mut matches = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if !PREPOSITIONS.contains(&token.text.as_str()) {
            continue;
        }

        let lead = match i.checked_sub(1).and_then(|p| tokens.get(p)) {
            Some(prev) if LEAD_IN_WORDS.contains(&prev.text.as_str()) => prev,
            _ => token,
        };

        let mut j = i + 1;
        while tokens
            .get(j)
            .is_some_and(|t| DETERMINERS.contains(&t.text.as_str()))
        {
            j += 1;
        }
        let Some(target) = tokens.get(j) else {
            continue;
        };

        // Prefer the longest code starting at the target token
        let code = codes
            .iter()
            .filter(|c| c.span.start == target.start)
            .max_by_key(|c| c.span.len());

        if let Some(code) = code {
            matches.push(location_match(
                code.value.clone(),
                Span::new(lead.start, code.span.end),
                PREPOSITIONAL_CODE_CONFIDENCE,
            ));
        } else if is_free_location_word(&target.text, ctx) {
            matches.push(location_match(
                target.text.clone(),
                Span::new(lead.start, target.end),
                FREE_WORD_CONFIDENCE,
            ));
        }
    }

    matches
}

fn is_free_location_word(word: &str, ctx: &RecognizerContext<'_>) -> bool {
    word.chars().count() >= 2
        && !word.chars().any(char::is_numeric)
        && !word.contains('$')
        && !ctx.lexicon.is_filler(word)
        && !ctx.lexicon.is_reserved(word)
}

fn location_match(value: String, span: Span, confidence: f64) -> EntityMatch {
    EntityMatch::new(EntityType::Location, EntityValue::Text(value), span, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizers::test_support::run;
    use crate::recognizers::Recognizer;

    fn best(raw: &str) -> Option<(String, f64)> {
        run(Recognizer::Location, raw)
            .into_iter()
            .max_by(|a, b| {
                a.confidence
                    .total_cmp(&b.confidence)
                    .then(a.span.len().cmp(&b.span.len()))
            })
            .map(|m| (m.value.to_string(), m.confidence))
    }

    #[test]
    fn test_bare_code_uppercased() {
        assert_eq!(best("a1 resistors"), Some(("A1".into(), BARE_CODE_CONFIDENCE)));
    }

    #[test]
    fn test_named_prefix_canonical_casing() {
        assert_eq!(best("Bin-23 caps"), Some(("bin-23".into(), NAMED_PREFIX_CONFIDENCE)));
        assert_eq!(best("DRAWER 3"), Some(("drawer 3".into(), NAMED_PREFIX_CONFIDENCE)));
        assert_eq!(best("Shelf-c2"), Some(("shelf-C2".into(), NAMED_PREFIX_CONFIDENCE)));
    }

    #[test]
    fn test_prepositional_code() {
        let matches = run(Recognizer::Location, "components in A1");
        let best = matches
            .iter()
            .find(|m| m.confidence == PREPOSITIONAL_CODE_CONFIDENCE)
            .unwrap();
        assert_eq!(best.value, EntityValue::text("A1"));
        assert_eq!(best.span, Span::new(11, 16));
    }

    #[test]
    fn test_lead_in_and_determiner() {
        let matches = run(Recognizer::Location, "resistors stored in the Garage");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, EntityValue::text("garage"));
        assert_eq!(matches[0].confidence, FREE_WORD_CONFIDENCE);
        assert_eq!(matches[0].span, Span::new(10, 30));
    }

    #[test]
    fn test_free_word_ignores_case() {
        assert_eq!(best("caps stored in the GARAGE"), best("caps stored in the garage"));
    }

    #[test]
    fn test_prepositional_named_prefix() {
        assert_eq!(
            best("kept in drawer B2"),
            Some(("drawer B2".into(), PREPOSITIONAL_CODE_CONFIDENCE))
        );
    }

    #[test]
    fn test_owned_words_are_not_locations() {
        assert_eq!(best("resistors in stock"), None);
        assert_eq!(best("caps at least $2"), None);
        assert_eq!(best("parts from TI"), None);
        assert_eq!(best("leds in 0805"), None);
        assert_eq!(best("in the"), None);
    }

    #[test]
    fn test_non_ascii_digits_are_not_codes() {
        assert_eq!(best("a\u{661} resistors"), None);
        assert_eq!(best("resistors in \u{665}\u{665}"), None);
        assert_eq!(best("drawer \u{663}"), None);
    }

    #[test]
    fn test_prefix_word_alone_is_not_a_code() {
        assert_eq!(best("bins of resistors"), None);
        assert_eq!(best("box with caps"), None);
    }
}
