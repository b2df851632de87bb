//! Inventory NLQ - Natural-Language Component Search Queries
//!
//! Turns a free-text query such as "10k SMD resistors with low stock in A1"
//! into structured entities, a confidence score, an intent label and a
//! decision on whether full-text search should be preferred.
//!
//! ## Pipeline
//!
//! Normalizer -> Recognizer Set -> Entity Merger -> Confidence Scorer /
//! Intent Classifier -> Fallback Decision -> Result Assembler
//!
//! ## Quick Start
//!
//! ```rust
//! use inventory_nlq::parse_query;
//!
//! let result = parse_query("10k SMD resistors with low stock");
//! assert_eq!(result.parsed_entities.component_type.as_deref(), Some("resistor"));
//! assert_eq!(result.parsed_entities.resistance.as_deref(), Some("10kΩ"));
//! assert!(!result.fallback_to_fts5);
//! ```
//!
//! Parsing never fails: malformed input is sanitized, and internal faults
//! are reported in `ParseResult.error` with full-text fallback forced.

// Core error handling
pub mod error;

// Settings and YAML loading
pub mod config;

// Lookup tables
pub mod lexicon;

// Pipeline stages
pub mod assemble;
pub mod intent;
pub mod merge;
pub mod normalize;
pub mod recognizers;
pub mod scoring;

// Orchestration
pub mod parser;

// Manual filter merge for the API layer
pub mod filters;

// Re-export the result types so callers need only this crate
pub use nlq_types::{
    EntityType, EntityValue, EntityValueError, Intent, ParseResult, ParsedEntities, PriceRange,
    StockStatus,
};

pub use config::{ConfigLoader, ParserConfig};
pub use error::{LexiconError, RecognizerError};
pub use filters::{plan_search, ManualFilters, SearchFilters, SearchPlan};
pub use lexicon::{Lexicon, LexiconConfig};
pub use parser::{default_parser, parse_query, ParseTrace, QueryParser};
