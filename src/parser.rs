//! QueryParser - natural-language query → [`ParseResult`].
//!
//! ## Pipeline
//!
//! ```text
//! query ─► truncate ─► normalize ─► recognizers ─► merge ─► score ─► assemble
//!                                                    │                  ▲
//!                                                    └──── intent ──────┘
//! ```
//!
//! The parser holds only immutable state (an `Arc<Lexicon>`, settings and
//! the recognizer set), so one instance serves any number of threads.

use std::sync::{Arc, LazyLock};

use nlq_types::ParseResult;
use serde::Serialize;

use crate::assemble::{assemble, Outcome};
use crate::config::ParserConfig;
use crate::error::{LexiconError, RecognizerError};
use crate::lexicon::{compile, Lexicon, LexiconConfig};
use crate::merge::merge;
use crate::normalize::{normalize_query, Token};
use crate::recognizers::{EntityMatch, RecognizerContext, RecognizerSet};
use crate::scoring::{score, ConfidenceBreakdown};

/// Intermediate state of one parse, for debugging.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseTrace {
    pub lexicon_hash: String,
    /// True when the query was cut to `max_query_chars`
    pub truncated: bool,
    pub normalized: String,
    pub tokens: Vec<Token>,
    /// Every recognizer candidate, before merging
    pub matches: Vec<EntityMatch>,
    /// Candidates the merger kept
    pub accepted: Vec<EntityMatch>,
    pub breakdown: ConfidenceBreakdown,
}

#[derive(Debug, Clone)]
pub struct QueryParser {
    lexicon: Arc<Lexicon>,
    config: ParserConfig,
    recognizers: RecognizerSet,
}

impl QueryParser {
    pub fn new(lexicon: Arc<Lexicon>, config: ParserConfig) -> Self {
        Self {
            lexicon,
            config,
            recognizers: RecognizerSet::standard(),
        }
    }

    /// Parser over the built-in tables and default settings.
    pub fn with_defaults() -> Result<Self, LexiconError> {
        let lexicon = compile(&LexiconConfig::default())?;
        Ok(Self::new(Arc::new(lexicon), ParserConfig::default()))
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a query. Never fails; faults surface in `ParseResult.error`.
    pub fn parse(&self, query: &str) -> ParseResult {
        self.parse_with_trace(query).0
    }

    /// Parse raw bytes; invalid UTF-8 is replaced before parsing.
    pub fn parse_bytes(&self, raw: &[u8]) -> ParseResult {
        self.parse(&String::from_utf8_lossy(raw))
    }

    pub fn parse_with_trace(&self, query: &str) -> (ParseResult, ParseTrace) {
        let (bounded, truncated) = truncate_chars(query, self.config.max_query_chars);
        let mut trace = ParseTrace {
            lexicon_hash: self.lexicon.hash.clone(),
            truncated,
            ..ParseTrace::default()
        };

        let outcome = match self.analyze(bounded, &mut trace) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    query_len = query.len(),
                    "recognizer fault, falling back to full-text search"
                );
                Outcome::Failed(err)
            }
        };

        let result = assemble(query, outcome, self.config.low_threshold);

        tracing::debug!(
            entities = result.parsed_entities.len(),
            confidence = result.confidence,
            intent = ?result.intent,
            fallback = result.fallback_to_fts5,
            truncated,
            "parsed query"
        );

        (result, trace)
    }

    fn analyze(&self, bounded: &str, trace: &mut ParseTrace) -> Result<Outcome, RecognizerError> {
        let normalized = normalize_query(bounded);
        trace.normalized = normalized.text().to_string();
        trace.tokens = normalized.tokens().to_vec();

        let ctx = RecognizerContext {
            lexicon: &self.lexicon,
            config: &self.config,
        };
        let matches = self.recognizers.recognize_all(&normalized, &ctx)?;
        trace.matches = matches.clone();

        let merged = merge(matches)?;
        let breakdown = score(&normalized, &merged.accepted, &self.lexicon);
        trace.accepted = merged.accepted;
        trace.breakdown = breakdown;

        Ok(Outcome::Parsed {
            entities: merged.entities,
            confidence: breakdown.confidence,
        })
    }
}

/// First `max_chars` characters of `s`, and whether anything was cut.
fn truncate_chars(s: &str, max_chars: usize) -> (&str, bool) {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => (&s[..idx], true),
        None => (s, false),
    }
}

static DEFAULT_PARSER: LazyLock<QueryParser> = LazyLock::new(|| {
    QueryParser::with_defaults().expect("built-in lexicon tables must compile")
});

/// Process-wide parser over the built-in tables, built on first use.
pub fn default_parser() -> &'static QueryParser {
    &DEFAULT_PARSER
}

/// Parse `query` with [`default_parser`].
pub fn parse_query(query: &str) -> ParseResult {
    DEFAULT_PARSER.parse(query)
}
