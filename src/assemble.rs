//! Result Assembler: packages one query's outcome as a [`ParseResult`].
//!
//! Pure construction. A failed outcome becomes a zero-confidence result
//! with the error text recorded and fallback forced.

use nlq_types::{ParseResult, ParsedEntities};

use crate::error::RecognizerError;
use crate::intent::classify;
use crate::scoring::should_fallback;

/// What the pipeline produced for one query.
#[derive(Debug, Clone)]
pub enum Outcome {
    Parsed {
        entities: ParsedEntities,
        confidence: f64,
    },
    Failed(RecognizerError),
}

pub fn assemble(query: &str, outcome: Outcome, low_threshold: f64) -> ParseResult {
    match outcome {
        Outcome::Parsed {
            entities,
            confidence,
        } => {
            let has_entities = !entities.is_empty();
            let confidence = if has_entities {
                confidence.clamp(0.0, 1.0)
            } else {
                0.0
            };
            ParseResult {
                query: query.to_string(),
                confidence,
                fallback_to_fts5: should_fallback(confidence, has_entities, low_threshold, false),
                intent: classify(&entities),
                parsed_entities: entities,
                error: None,
            }
        }
        Outcome::Failed(err) => ParseResult {
            query: query.to_string(),
            confidence: 0.0,
            parsed_entities: ParsedEntities::new(),
            fallback_to_fts5: true,
            intent: None,
            error: Some(err.to_string()),
        },
    }
}
