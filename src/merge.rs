//! Entity Merger
//!
//! Resolves the raw recognizer output into at most one value per entity
//! type, with no two accepted matches sharing any part of the text.
//!
//! Matches are considered in a fixed order and accepted greedily:
//! 1. Type priority: value/unit > location > package > manufacturer >
//!    component type > stock status > price
//! 2. Higher local confidence
//! 3. Longer span
//! 4. Earlier start
//!
//! A match is accepted when its type is still unfilled and its span does
//! not overlap an already accepted span.

use std::cmp::Ordering;

use nlq_types::{EntityType, ParsedEntities};

use crate::error::RecognizerError;
use crate::recognizers::EntityMatch;

/// Lower runs first.
pub fn type_priority(entity_type: EntityType) -> u8 {
    match entity_type {
        EntityType::Resistance
        | EntityType::Capacitance
        | EntityType::Voltage
        | EntityType::Inductance
        | EntityType::Current
        | EntityType::Frequency => 0,
        EntityType::Location => 1,
        EntityType::Package => 2,
        EntityType::Manufacturer => 3,
        EntityType::ComponentType => 4,
        EntityType::StockStatus => 5,
        EntityType::Price => 6,
    }
}

/// Merge result: the public entity map plus the matches that produced it.
#[derive(Debug, Clone, Default)]
pub struct MergedEntities {
    pub entities: ParsedEntities,
    /// Accepted matches in acceptance order; spans are kept for coverage
    pub accepted: Vec<EntityMatch>,
}

fn merge_order(a: &EntityMatch, b: &EntityMatch) -> Ordering {
    type_priority(a.entity_type)
        .cmp(&type_priority(b.entity_type))
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| b.span.len().cmp(&a.span.len()))
        .then_with(|| a.span.start.cmp(&b.span.start))
        .then_with(|| a.entity_type.cmp(&b.entity_type))
}

pub fn merge(mut matches: Vec<EntityMatch>) -> Result<MergedEntities, RecognizerError> {
    matches.sort_by(merge_order);

    let mut merged = MergedEntities::default();
    for candidate in matches {
        if merged.entities.contains(candidate.entity_type) {
            continue;
        }
        if merged
            .accepted
            .iter()
            .any(|accepted| accepted.span.overlaps(&candidate.span))
        {
            continue;
        }
        merged
            .entities
            .set(candidate.entity_type, candidate.value.clone())?;
        merged.accepted.push(candidate);
    }

    Ok(merged)
}
