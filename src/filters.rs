//! Search filters: parsed entities combined with explicit manual parameters.
//!
//! A manual parameter always overrides the parsed value for the same field
//! ("manual wins"). Applying the same manual filters twice gives the same
//! result as applying them once.

use nlq_types::{ParseResult, ParsedEntities, StockStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Filter parameters supplied explicitly by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualFilters {
    pub category: Option<String>,
    pub component_type: Option<String>,
    pub stock_status: Option<StockStatus>,
    pub location: Option<String>,
    pub resistance: Option<String>,
    pub capacitance: Option<String>,
    pub voltage: Option<String>,
    pub inductance: Option<String>,
    pub current: Option<String>,
    pub frequency: Option<String>,
    pub package: Option<String>,
    pub manufacturer: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_min: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_max: Option<Decimal>,
}

/// Structured filters handed to the search engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
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
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_min: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_max: Option<Decimal>,
}

fn override_with<T: Clone>(field: &mut Option<T>, manual: &Option<T>) {
    if let Some(value) = manual {
        *field = Some(value.clone());
    }
}

impl SearchFilters {
    pub fn from_parsed(entities: &ParsedEntities) -> Self {
        Self {
            category: None,
            component_type: entities.component_type.clone(),
            stock_status: entities.stock_status,
            location: entities.location.clone(),
            resistance: entities.resistance.clone(),
            capacitance: entities.capacitance.clone(),
            voltage: entities.voltage.clone(),
            inductance: entities.inductance.clone(),
            current: entities.current.clone(),
            frequency: entities.frequency.clone(),
            package: entities.package.clone(),
            manufacturer: entities.manufacturer.clone(),
            price_min: entities.price.and_then(|p| p.min),
            price_max: entities.price.and_then(|p| p.max),
        }
    }

    /// Apply manual parameters field by field; manual values win.
    pub fn with_manual(mut self, manual: &ManualFilters) -> Self {
        override_with(&mut self.category, &manual.category);
        override_with(&mut self.component_type, &manual.component_type);
        override_with(&mut self.stock_status, &manual.stock_status);
        override_with(&mut self.location, &manual.location);
        override_with(&mut self.resistance, &manual.resistance);
        override_with(&mut self.capacitance, &manual.capacitance);
        override_with(&mut self.voltage, &manual.voltage);
        override_with(&mut self.inductance, &manual.inductance);
        override_with(&mut self.current, &manual.current);
        override_with(&mut self.frequency, &manual.frequency);
        override_with(&mut self.package, &manual.package);
        override_with(&mut self.manufacturer, &manual.manufacturer);
        override_with(&mut self.price_min, &manual.price_min);
        override_with(&mut self.price_max, &manual.price_max);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// How the search engine should run a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchPlan {
    /// Parsed entities (plus manual overrides) drive the search
    Structured { filters: SearchFilters },
    /// Full-text search over the raw query, narrowed by manual filters only
    FullText {
        query: String,
        filters: SearchFilters,
    },
}

/// Decide between structured and full-text search for a parsed query.
pub fn plan_search(result: &ParseResult, manual: &ManualFilters) -> SearchPlan {
    if result.fallback_to_fts5 {
        SearchPlan::FullText {
            query: result.query.clone(),
            filters: SearchFilters::default().with_manual(manual),
        }
    } else {
        SearchPlan::Structured {
            filters: SearchFilters::from_parsed(&result.parsed_entities).with_manual(manual),
        }
    }
}
