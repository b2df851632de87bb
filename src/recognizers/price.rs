//! Price recognizer
//!
//! Forms, most specific first:
//! - Ranges: `between $X and $Y`, `$X to $Y`, `$X-$Y`
//! - Comparatives: `under|below|less than|... X` (max), `over|above|... X` (min)
//! - Exact: `$X`, `exactly $X`, `X dollars`
//! - Keywords: `cheap`, `budget`, ... → max of the configured cheap price
//!
//! An amount written with `$` or a currency word is explicit; comparatives
//! and ranges also accept a plain number, with lower confidence.

use std::sync::LazyLock;

use nlq_types::{EntityType, EntityValue, PriceRange};
use regex::{Captures, Regex};
use rust_decimal::Decimal;

use super::{EntityMatch, RecognizerContext, Span};
use crate::error::RecognizerError;
use crate::normalize::NormalizedQuery;

pub const EXPLICIT_CONFIDENCE: f64 = 0.95;
pub const IMPLICIT_CONFIDENCE: f64 = 0.75;
pub const EXACTLY_CONFIDENCE: f64 = 0.9;
pub const EXACT_CONFIDENCE: f64 = 0.85;
pub const KEYWORD_CONFIDENCE: f64 = 0.6;

/// Words the comparative and range patterns consume.
pub const OPERATOR_WORDS: &[&str] = &[
    "under", "below", "less", "than", "cheaper", "up", "most", "more", "no", "not", "max",
    "maximum", "over", "above", "greater", "least", "min", "minimum", "between", "exactly",
    "dollars", "dollar", "usd", "bucks",
];

const MAX_OPERATORS: &str =
    r"under|below|less than|cheaper than|up to|at most|no more than|not more than|maximum|max";
const MIN_OPERATORS: &str = r"over|above|more than|greater than|at least|minimum|min";
// ASCII digits only: `Decimal` parses nothing else
const AMOUNT: &str = r"([0-9]+(?:\.[0-9]+)?)";
const CURRENCY: &str = r"(?:\s*(?:dollars?|usd|bucks))";

static BETWEEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\bbetween\s+(\$)?{AMOUNT}\s+and\s+(\$)?{AMOUNT}({CURRENCY})?\b"
    ))
    .unwrap()
});

static DOLLAR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\${AMOUNT}\s*(?:-|to)\s*\$?{AMOUNT}\b")).unwrap()
});

static AT_MOST: LazyLock<Regex> = LazyLock::new(|| comparative(MAX_OPERATORS));

static AT_LEAST: LazyLock<Regex> = LazyLock::new(|| comparative(MIN_OPERATORS));

static EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(\bexactly\s+)?(?:\${AMOUNT}\b|\b{AMOUNT}{CURRENCY}\b)"
    ))
    .unwrap()
});

/// `<operator> $X`, `<operator> X dollars` or `<operator> X`.
/// Groups: 1 = `$` amount, 2 = plain amount, 3 = currency word.
fn comparative(operators: &str) -> Regex {
    Regex::new(&format!(
        r"\b(?:{operators})\s+(?:\${AMOUNT}|{AMOUNT}({CURRENCY})?)\b"
    ))
    .unwrap()
}

pub fn recognize(
    query: &NormalizedQuery,
    ctx: &RecognizerContext<'_>,
) -> Result<Vec<EntityMatch>, RecognizerError> {
    let text = query.text();
    let mut matches = Vec::new();

    for caps in BETWEEN.captures_iter(text) {
        let explicit = caps.get(1).is_some() || caps.get(3).is_some() || caps.get(5).is_some();
        let (Some(a), Some(b)) = (caps.get(2), caps.get(4)) else {
            continue;
        };
        let range = PriceRange::between(amount(a.as_str())?, amount(b.as_str())?);
        matches.push(price_match(&caps, range, explicit_confidence(explicit)));
    }

    for caps in DOLLAR_RANGE.captures_iter(text) {
        let (Some(a), Some(b)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let range = PriceRange::between(amount(a.as_str())?, amount(b.as_str())?);
        matches.push(price_match(&caps, range, EXPLICIT_CONFIDENCE));
    }

    for (regex, bound) in [
        (&*AT_MOST, PriceRange::at_most as fn(Decimal) -> PriceRange),
        (&*AT_LEAST, PriceRange::at_least as fn(Decimal) -> PriceRange),
    ] {
        for caps in regex.captures_iter(text) {
            let (value, explicit) = match (caps.get(1), caps.get(2)) {
                (Some(dollar), _) => (dollar, true),
                (None, Some(plain)) => (plain, caps.get(3).is_some()),
                (None, None) => continue,
            };
            let range = bound(amount(value.as_str())?);
            matches.push(price_match(&caps, range, explicit_confidence(explicit)));
        }
    }

    for caps in EXACT.captures_iter(text) {
        let Some(value) = caps.get(2).or_else(|| caps.get(3)) else {
            continue;
        };
        let confidence = if caps.get(1).is_some() {
            EXACTLY_CONFIDENCE
        } else {
            EXACT_CONFIDENCE
        };
        let range = PriceRange::exactly(amount(value.as_str())?);
        matches.push(price_match(&caps, range, confidence));
    }

    let tokens = query.tokens();
    for hit in ctx.lexicon.price_keywords.scan(tokens) {
        matches.push(EntityMatch::new(
            EntityType::Price,
            EntityValue::Price(PriceRange::at_most(ctx.config.cheap_price_max)),
            Span::of_tokens(&tokens[hit.first], &tokens[hit.last]),
            KEYWORD_CONFIDENCE,
        ));
    }

    Ok(matches)
}

fn explicit_confidence(explicit: bool) -> f64 {
    if explicit {
        EXPLICIT_CONFIDENCE
    } else {
        IMPLICIT_CONFIDENCE
    }
}

fn amount(text: &str) -> Result<Decimal, RecognizerError> {
    text.parse::<Decimal>()
        .map_err(|_| RecognizerError::InvalidAmount {
            text: text.to_string(),
        })
}

fn price_match(caps: &Captures<'_>, range: PriceRange, confidence: f64) -> EntityMatch {
    let span = caps
        .get(0)
        .map_or(Span::new(0, 0), |m| Span::new(m.start(), m.end()));
    EntityMatch::new(EntityType::Price, EntityValue::Price(range), span, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizers::test_support::run;
    use crate::recognizers::Recognizer;

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn best(raw: &str) -> Option<(PriceRange, f64)> {
        run(Recognizer::Price, raw)
            .into_iter()
            .max_by(|a, b| {
                a.confidence
                    .total_cmp(&b.confidence)
                    .then(a.span.len().cmp(&b.span.len()))
            })
            .and_then(|m| match m.value {
                EntityValue::Price(range) => Some((range, m.confidence)),
                _ => None,
            })
    }

    #[test]
    fn test_upper_bound_forms() {
        for query in ["under $5", "below $5", "less than $5", "up to 5 dollars", "max $5"] {
            assert_eq!(
                best(query),
                Some((PriceRange::at_most(dec("5")), EXPLICIT_CONFIDENCE)),
                "{query}"
            );
        }
        assert_eq!(
            best("cheaper than 2.50"),
            Some((PriceRange::at_most(dec("2.50")), IMPLICIT_CONFIDENCE))
        );
    }

    #[test]
    fn test_lower_bound_forms() {
        assert_eq!(
            best("over $10"),
            Some((PriceRange::at_least(dec("10")), EXPLICIT_CONFIDENCE))
        );
        assert_eq!(
            best("at least 3"),
            Some((PriceRange::at_least(dec("3")), IMPLICIT_CONFIDENCE))
        );
    }

    #[test]
    fn test_ranges() {
        let expected = Some((PriceRange::between(dec("5"), dec("10")), EXPLICIT_CONFIDENCE));
        assert_eq!(best("$5 to $10"), expected);
        assert_eq!(best("$5-$10"), expected);
        assert_eq!(best("between $10 and $5"), expected);
        assert_eq!(
            best("between 5 and 10"),
            Some((PriceRange::between(dec("5"), dec("10")), IMPLICIT_CONFIDENCE))
        );
    }

    #[test]
    fn test_exact_price() {
        assert_eq!(
            best("exactly $2"),
            Some((PriceRange::exactly(dec("2")), EXACTLY_CONFIDENCE))
        );
        assert_eq!(
            best("$0.10 each"),
            Some((PriceRange::exactly(dec("0.10")), EXACT_CONFIDENCE))
        );
    }

    #[test]
    fn test_keyword_uses_configured_cheap_max() {
        let matches = run(Recognizer::Price, "cheap resistors");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, EntityValue::Price(PriceRange::at_most(dec("5"))));
        assert_eq!(matches[0].confidence, KEYWORD_CONFIDENCE);
        assert_eq!(matches[0].span, Span::new(0, 5));
    }

    #[test]
    fn test_units_are_not_prices() {
        assert_eq!(best("under 5v"), None);
        assert_eq!(best("10k resistors"), None);
    }

    #[test]
    fn test_non_ascii_digits_are_not_amounts() {
        // Arabic-Indic five
        assert_eq!(best("under \u{665}"), None);
        assert_eq!(best("\u{665}\u{660} dollars"), None);
    }

    #[test]
    fn test_unrepresentable_amount_is_an_error() {
        let query = crate::normalize::normalize_query("under $999999999999999999999999999999999");
        let lexicon = crate::lexicon::compile(&Default::default()).unwrap();
        let config = crate::config::ParserConfig::default();
        let ctx = RecognizerContext {
            lexicon: &lexicon,
            config: &config,
        };
        let err = recognize(&query, &ctx).unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidAmount { .. }));
    }
}
