//! Component type recognizer: whole-token synonym lookup.

use nlq_types::{EntityType, EntityValue};

use super::{EntityMatch, RecognizerContext, Span};
use crate::normalize::NormalizedQuery;

pub const CANONICAL_CONFIDENCE: f64 = 0.95;
pub const LONG_ALIAS_CONFIDENCE: f64 = 0.9;
pub const SHORT_ALIAS_CONFIDENCE: f64 = 0.8;
pub const SINGLE_LETTER_CONFIDENCE: f64 = 0.6;

/// Aliases up to this many characters count as abbreviations ("res", "caps").
const SHORT_ALIAS_MAX_CHARS: usize = 4;

pub fn recognize(query: &NormalizedQuery, ctx: &RecognizerContext<'_>) -> Vec<EntityMatch> {
    let tokens = query.tokens();
    ctx.lexicon
        .component_types
        .scan(tokens)
        .into_iter()
        .map(|hit| {
            let entry = hit.entry;
            EntityMatch::new(
                EntityType::ComponentType,
                EntityValue::text(entry.canonical.clone()),
                Span::of_tokens(&tokens[hit.first], &tokens[hit.last]),
                alias_confidence(&entry.phrase, &entry.canonical, entry.tokens),
            )
        })
        .collect()
}

/// Specificity of an alias: canonical names and plurals beat abbreviations,
/// and a lone letter ("r") is the weakest signal.
fn alias_confidence(alias: &str, canonical: &str, tokens: usize) -> f64 {
    let canonical = canonical.replace('_', " ");
    let is_inflection = alias == canonical
        || alias
            .strip_prefix(canonical.as_str())
            .is_some_and(|rest| rest == "s" || rest == "es");

    if is_inflection || tokens > 1 {
        CANONICAL_CONFIDENCE
    } else if alias.chars().count() == 1 {
        SINGLE_LETTER_CONFIDENCE
    } else if alias.chars().count() <= SHORT_ALIAS_MAX_CHARS {
        SHORT_ALIAS_CONFIDENCE
    } else {
        LONG_ALIAS_CONFIDENCE
    }
}
