//! Recognizer Set
//!
//! A closed set of matchers, one per entity family. Every recognizer scans
//! the same [`NormalizedQuery`] independently and reports every candidate
//! it finds; overlapping and duplicate candidates are resolved later by the
//! merger.
//!
//! Spans are byte offsets into the normalized text.

pub mod component_type;
pub mod location;
pub mod manufacturer;
pub mod package;
pub mod price;
pub mod quantity;
pub mod stock_status;

use nlq_types::{EntityType, EntityValue};
use serde::Serialize;

use crate::config::ParserConfig;
use crate::error::RecognizerError;
use crate::lexicon::Lexicon;
use crate::normalize::{NormalizedQuery, Token};

pub use quantity::Quantity;

/// Half-open byte range in the normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span from the first byte of `first` to the last byte of `last`.
    pub fn of_tokens(first: &Token, last: &Token) -> Self {
        Self::new(first.start, last.end)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One candidate entity found by a recognizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityMatch {
    pub entity_type: EntityType,
    pub value: EntityValue,
    pub span: Span,
    /// Match specificity in [0, 1]
    pub confidence: f64,
}

impl EntityMatch {
    pub fn new(entity_type: EntityType, value: EntityValue, span: Span, confidence: f64) -> Self {
        Self {
            entity_type,
            value,
            span,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Read-only inputs shared by every recognizer for one parse.
#[derive(Debug, Clone, Copy)]
pub struct RecognizerContext<'a> {
    pub lexicon: &'a Lexicon,
    pub config: &'a ParserConfig,
}

/// The recognizer variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognizer {
    ComponentType,
    StockStatus,
    Location,
    Quantity(Quantity),
    Package,
    Manufacturer,
    Price,
}

impl Recognizer {
    /// Entity type this recognizer produces.
    pub fn entity_type(&self) -> EntityType {
        match self {
            Recognizer::ComponentType => EntityType::ComponentType,
            Recognizer::StockStatus => EntityType::StockStatus,
            Recognizer::Location => EntityType::Location,
            Recognizer::Quantity(q) => q.entity_type(),
            Recognizer::Package => EntityType::Package,
            Recognizer::Manufacturer => EntityType::Manufacturer,
            Recognizer::Price => EntityType::Price,
        }
    }

    pub fn recognize(
        &self,
        query: &NormalizedQuery,
        ctx: &RecognizerContext<'_>,
    ) -> Result<Vec<EntityMatch>, RecognizerError> {
        match self {
            Recognizer::ComponentType => Ok(component_type::recognize(query, ctx)),
            Recognizer::StockStatus => Ok(stock_status::recognize(query, ctx)),
            Recognizer::Location => Ok(location::recognize(query, ctx)),
            Recognizer::Quantity(q) => Ok(q.recognize(query)),
            Recognizer::Package => Ok(package::recognize(query, ctx)),
            Recognizer::Manufacturer => Ok(manufacturer::recognize(query, ctx)),
            Recognizer::Price => price::recognize(query, ctx),
        }
    }
}

/// Fixed, ordered collection of recognizers.
#[derive(Debug, Clone)]
pub struct RecognizerSet {
    recognizers: Vec<Recognizer>,
}

impl Default for RecognizerSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RecognizerSet {
    /// One recognizer per entity type.
    pub fn standard() -> Self {
        let mut recognizers = vec![
            Recognizer::ComponentType,
            Recognizer::StockStatus,
            Recognizer::Location,
        ];
        recognizers.extend(Quantity::ALL.into_iter().map(Recognizer::Quantity));
        recognizers.extend([Recognizer::Package, Recognizer::Manufacturer, Recognizer::Price]);
        Self { recognizers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recognizer> {
        self.recognizers.iter()
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Run every recognizer; the first failure aborts the scan.
    pub fn recognize_all(
        &self,
        query: &NormalizedQuery,
        ctx: &RecognizerContext<'_>,
    ) -> Result<Vec<EntityMatch>, RecognizerError> {
        let mut matches = Vec::new();
        for recognizer in &self.recognizers {
            matches.extend(recognizer.recognize(query, ctx)?);
        }
        Ok(matches)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::LazyLock;

    use super::*;
    use crate::lexicon::{compile, LexiconConfig};
    use crate::normalize::normalize_query;

    static LEXICON: LazyLock<Lexicon> =
        LazyLock::new(|| compile(&LexiconConfig::default()).unwrap());
    static CONFIG: LazyLock<ParserConfig> = LazyLock::new(ParserConfig::default);

    /// Run `recognizer` over `raw` with the built-in tables.
    pub fn run(recognizer: Recognizer, raw: &str) -> Vec<EntityMatch> {
        let query = normalize_query(raw);
        let ctx = RecognizerContext {
            lexicon: &LEXICON,
            config: &CONFIG,
        };
        recognizer.recognize(&query, &ctx).unwrap()
    }

    /// Values of all matches, as display strings.
    pub fn values(matches: &[EntityMatch]) -> Vec<String> {
        matches.iter().map(|m| m.value.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_covers_every_entity_type() {
        let set = RecognizerSet::standard();
        let mut types: Vec<EntityType> = set.iter().map(|r| r.entity_type()).collect();
        types.sort();
        assert_eq!(types, EntityType::ALL.to_vec());
    }

    #[test]
    fn test_span_overlap() {
        let a = Span::new(0, 5);
        assert!(a.overlaps(&Span::new(4, 8)));
        assert!(!a.overlaps(&Span::new(5, 8)));
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn test_match_confidence_clamped() {
        let m = EntityMatch::new(
            EntityType::Location,
            EntityValue::text("A1"),
            Span::new(0, 2),
            1.7,
        );
        assert_eq!(m.confidence, 1.0);
    }
}
