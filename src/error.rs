//! Error types for recognition and lexicon compilation.

use nlq_types::EntityValueError;
use thiserror::Error;

/// A recognizer could not turn matched text into an entity value.
///
/// Never escapes [`QueryParser::parse`](crate::QueryParser::parse): it is
/// recorded in `ParseResult.error` and forces full-text fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognizerError {
    #[error("price amount '{text}' is not a representable decimal")]
    InvalidAmount { text: String },

    #[error(transparent)]
    ValueShape(#[from] EntityValueError),
}

/// Errors building a [`Lexicon`](crate::lexicon::Lexicon).
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("{table}: alias for '{canonical}' is empty after normalization")]
    EmptyAlias { table: &'static str, canonical: String },

    #[error("{table}: alias '{alias}' maps to both '{first}' and '{second}'")]
    ConflictingAlias {
        table: &'static str,
        alias: String,
        first: String,
        second: String,
    },

    #[error("stock_status: unknown status '{0}'")]
    UnknownStockStatus(String),

    #[error("invalid lexicon pattern")]
    Pattern(#[from] regex::Error),
}
