//! NLQ Types - Foundation Types for the Natural-Language Query Parser
//!
//! This crate contains the pure data structures that cross the parser
//! boundary. The API layer embeds [`ParseResult`] into its responses as
//! `nl_metadata`, and the search engine reads [`ParsedEntities`] to build
//! structured filters.
//!
//! ## Contents
//!
//! - Entity taxonomy ([`EntityType`]) and value shapes ([`EntityValue`])
//! - Stock status vocabulary ([`StockStatus`])
//! - Price bounds ([`PriceRange`])
//! - The merged entity map ([`ParsedEntities`])
//! - Intent labels ([`Intent`])
//! - The per-request result ([`ParseResult`])
//!
//! ## Rules
//!
//! 1. **NO RECOGNITION LOGIC** - Only data structures and accessors
//! 2. **NO WORKSPACE DEPENDENCIES**
//! 3. **SERIALIZABLE** - All types support serde
//! 4. **ONE VALUE PER TYPE** - `ParsedEntities` holds at most one value per
//!    entity type, enforced by its shape rather than by convention

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// ENTITY TAXONOMY
// ============================================================================

/// The closed set of entity types the parser can recognize.
///
/// Declaration order is the canonical reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    ComponentType,
    StockStatus,
    Location,
    Resistance,
    Capacitance,
    Voltage,
    Inductance,
    Current,
    Frequency,
    Package,
    Manufacturer,
    Price,
}

impl EntityType {
    /// Every entity type, in canonical order.
    pub const ALL: [EntityType; 12] = [
        EntityType::ComponentType,
        EntityType::StockStatus,
        EntityType::Location,
        EntityType::Resistance,
        EntityType::Capacitance,
        EntityType::Voltage,
        EntityType::Inductance,
        EntityType::Current,
        EntityType::Frequency,
        EntityType::Package,
        EntityType::Manufacturer,
        EntityType::Price,
    ];

    /// Wire name of the type (the key used in `parsed_entities`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::ComponentType => "component_type",
            EntityType::StockStatus => "stock_status",
            EntityType::Location => "location",
            EntityType::Resistance => "resistance",
            EntityType::Capacitance => "capacitance",
            EntityType::Voltage => "voltage",
            EntityType::Inductance => "inductance",
            EntityType::Current => "current",
            EntityType::Frequency => "frequency",
            EntityType::Package => "package",
            EntityType::Manufacturer => "manufacturer",
            EntityType::Price => "price",
        }
    }

    /// True for the numeric value-plus-unit types.
    pub fn is_value_unit(&self) -> bool {
        matches!(
            self,
            EntityType::Resistance
                | EntityType::Capacitance
                | EntityType::Voltage
                | EntityType::Inductance
                | EntityType::Current
                | EntityType::Frequency
        )
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// STOCK STATUS
// ============================================================================

/// Canonical stock-status filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Low,
    OutOfStock,
    Available,
    Unused,
    NeedsReorder,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Low => "low",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::Available => "available",
            StockStatus::Unused => "unused",
            StockStatus::NeedsReorder => "needs_reorder",
        }
    }

    /// Parse a canonical wire name.
    pub fn from_canonical(s: &str) -> Option<Self> {
        match s {
            "low" => Some(StockStatus::Low),
            "out_of_stock" => Some(StockStatus::OutOfStock),
            "available" => Some(StockStatus::Available),
            "unused" => Some(StockStatus::Unused),
            "needs_reorder" => Some(StockStatus::NeedsReorder),
            _ => None,
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PRICE
// ============================================================================

/// Price bounds in the inventory's currency.
///
/// An exact price is represented as `min == max`. Bounds serialize as JSON
/// numbers and are omitted when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub min: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Upper bound only ("under $5", "cheap")
    pub fn at_most(max: Decimal) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Lower bound only ("over $5")
    pub fn at_least(min: Decimal) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Closed range. Bounds given in the wrong order are swapped.
    pub fn between(a: Decimal, b: Decimal) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Exact price ("exactly $2")
    pub fn exactly(price: Decimal) -> Self {
        Self {
            min: Some(price),
            max: Some(price),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.min.is_some() && self.min == self.max
    }
}

// ============================================================================
// ENTITY VALUES
// ============================================================================

/// The value shapes an entity can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityValue {
    Price(PriceRange),
    Stock(StockStatus),
    Text(String),
}

impl EntityValue {
    pub fn text(value: impl Into<String>) -> Self {
        EntityValue::Text(value.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            EntityValue::Price(_) => "price range",
            EntityValue::Stock(_) => "stock status",
            EntityValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for EntityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityValue::Text(s) => f.write_str(s),
            EntityValue::Stock(s) => f.write_str(s.as_str()),
            EntityValue::Price(p) => match (p.min, p.max) {
                (Some(min), Some(max)) if min == max => write!(f, "${}", min),
                (Some(min), Some(max)) => write!(f, "${}-${}", min, max),
                (None, Some(max)) => write!(f, "<= ${}", max),
                (Some(min), None) => write!(f, ">= ${}", min),
                (None, None) => f.write_str("any price"),
            },
        }
    }
}

/// Assigning a value of the wrong shape to an entity type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot assign a {found} value to entity type '{entity_type}'")]
pub struct EntityValueError {
    pub entity_type: EntityType,
    pub found: &'static str,
}

// ============================================================================
// PARSED ENTITIES
// ============================================================================

/// Merged entity map: at most one value per entity type.
///
/// Serializes as a JSON object keyed by entity type wire names, containing
/// only the types that were recognized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedEntities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<StockStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacitance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inductance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceRange>,
}

impl ParsedEntities {
    pub fn new() -> Self {
        Self::default()
    }

    fn text_slot(&mut self, entity_type: EntityType) -> Option<&mut Option<String>> {
        match entity_type {
            EntityType::ComponentType => Some(&mut self.component_type),
            EntityType::Location => Some(&mut self.location),
            EntityType::Resistance => Some(&mut self.resistance),
            EntityType::Capacitance => Some(&mut self.capacitance),
            EntityType::Voltage => Some(&mut self.voltage),
            EntityType::Inductance => Some(&mut self.inductance),
            EntityType::Current => Some(&mut self.current),
            EntityType::Frequency => Some(&mut self.frequency),
            EntityType::Package => Some(&mut self.package),
            EntityType::Manufacturer => Some(&mut self.manufacturer),
            EntityType::StockStatus | EntityType::Price => None,
        }
    }

    fn text_ref(&self, entity_type: EntityType) -> Option<&Option<String>> {
        match entity_type {
            EntityType::ComponentType => Some(&self.component_type),
            EntityType::Location => Some(&self.location),
            EntityType::Resistance => Some(&self.resistance),
            EntityType::Capacitance => Some(&self.capacitance),
            EntityType::Voltage => Some(&self.voltage),
            EntityType::Inductance => Some(&self.inductance),
            EntityType::Current => Some(&self.current),
            EntityType::Frequency => Some(&self.frequency),
            EntityType::Package => Some(&self.package),
            EntityType::Manufacturer => Some(&self.manufacturer),
            EntityType::StockStatus | EntityType::Price => None,
        }
    }

    /// Store `value` under `entity_type`, replacing any previous value.
    ///
    /// Returns the replaced value, or an error if the value shape does not
    /// fit the type (text for most types, stock status, price range).
    pub fn set(
        &mut self,
        entity_type: EntityType,
        value: EntityValue,
    ) -> Result<Option<EntityValue>, EntityValueError> {
        match (entity_type, value) {
            (EntityType::StockStatus, EntityValue::Stock(s)) => {
                Ok(self.stock_status.replace(s).map(EntityValue::Stock))
            }
            (EntityType::Price, EntityValue::Price(p)) => {
                Ok(self.price.replace(p).map(EntityValue::Price))
            }
            (ty, EntityValue::Text(s)) => match self.text_slot(ty) {
                Some(slot) => Ok(slot.replace(s).map(EntityValue::Text)),
                None => Err(EntityValueError {
                    entity_type: ty,
                    found: "text",
                }),
            },
            (ty, other) => Err(EntityValueError {
                entity_type: ty,
                found: other.kind(),
            }),
        }
    }

    /// Value stored under `entity_type`, if any.
    pub fn get(&self, entity_type: EntityType) -> Option<EntityValue> {
        match entity_type {
            EntityType::StockStatus => self.stock_status.map(EntityValue::Stock),
            EntityType::Price => self.price.map(EntityValue::Price),
            ty => self
                .text_ref(ty)
                .and_then(|v| v.clone())
                .map(EntityValue::Text),
        }
    }

    pub fn contains(&self, entity_type: EntityType) -> bool {
        match entity_type {
            EntityType::StockStatus => self.stock_status.is_some(),
            EntityType::Price => self.price.is_some(),
            ty => self.text_ref(ty).is_some_and(|v| v.is_some()),
        }
    }

    /// Recognized types in canonical order.
    pub fn entity_types(&self) -> Vec<EntityType> {
        EntityType::ALL
            .into_iter()
            .filter(|ty| self.contains(*ty))
            .collect()
    }

    /// (type, value) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityType, EntityValue)> + '_ {
        EntityType::ALL
            .into_iter()
            .filter_map(move |ty| self.get(ty).map(|v| (ty, v)))
    }

    pub fn len(&self) -> usize {
        self.entity_types().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// INTENT
// ============================================================================

/// Dominant purpose of a query, derived from which entity types fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SearchByType,
    FilterByStock,
    FilterByLocation,
    SearchBySpecification,
    FilterByPrice,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SearchByType => "search_by_type",
            Intent::FilterByStock => "filter_by_stock",
            Intent::FilterByLocation => "filter_by_location",
            Intent::SearchBySpecification => "search_by_specification",
            Intent::FilterByPrice => "filter_by_price",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PARSE RESULT
// ============================================================================

/// Outcome of parsing one query. Created once per request, never mutated.
///
/// This is the `nl_metadata` object of the search API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// The query exactly as received
    pub query: String,
    /// Overall confidence, always within [0, 1]
    pub confidence: f64,
    /// Merged entities
    pub parsed_entities: ParsedEntities,
    /// Whether the caller should prefer full-text search
    pub fallback_to_fts5: bool,
    /// Null only when no entity was recognized
    pub intent: Option<Intent>,
    /// Present only on internal failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseResult {
    /// True when structured filters should drive the search.
    pub fn is_structured(&self) -> bool {
        !self.fallback_to_fts5
    }
}
