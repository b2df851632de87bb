//! Package recognizer
//!
//! Three kinds of evidence, most specific first:
//! - Complete codes matched as whole tokens (`0805`, `d2pak`)
//! - Family plus an attached or hyphenated number (`sot-23`, `to220`)
//! - Bare families (`qfn`) and generic mounting keywords (`smd`, `through-hole`)

use nlq_types::{EntityType, EntityValue};

use super::{EntityMatch, RecognizerContext, Span};
use crate::normalize::NormalizedQuery;

pub const CODE_CONFIDENCE: f64 = 0.95;
pub const FAMILY_CONFIDENCE: f64 = 0.85;
pub const GENERIC_CONFIDENCE: f64 = 0.7;

pub fn recognize(query: &NormalizedQuery, ctx: &RecognizerContext<'_>) -> Vec<EntityMatch> {
    let lexicon = ctx.lexicon;
    let tokens = query.tokens();
    let mut matches = Vec::new();

    for token in tokens {
        if lexicon.package_codes.contains(&token.text) {
            matches.push(package_match(
                token.text.to_uppercase(),
                Span::new(token.start, token.end),
                CODE_CONFIDENCE,
            ));
        } else if lexicon.package_bare_families.contains(&token.text) {
            matches.push(package_match(
                token.text.to_uppercase(),
                Span::new(token.start, token.end),
                FAMILY_CONFIDENCE,
            ));
        }
    }

    if let Some(family) = &lexicon.package_family {
        for caps in family.captures_iter(query.text()) {
            let (Some(whole), Some(name), Some(number)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            matches.push(package_match(
                format!("{}-{}", name.as_str().to_uppercase(), number.as_str()),
                Span::new(whole.start(), whole.end()),
                CODE_CONFIDENCE,
            ));
        }
    }

    for hit in lexicon.package_generic.scan(tokens) {
        matches.push(package_match(
            hit.entry.canonical.clone(),
            Span::of_tokens(&tokens[hit.first], &tokens[hit.last]),
            GENERIC_CONFIDENCE,
        ));
    }

    matches
}

fn package_match(value: String, span: Span, confidence: f64) -> EntityMatch {
    EntityMatch::new(EntityType::Package, EntityValue::Text(value), span, confidence)
}
