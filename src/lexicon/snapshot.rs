//! Lexicon - Compiled, immutable lookup tables.
//!
//! Built once by the compiler and shared via `Arc<Lexicon>`. Every phrase
//! is indexed under its normalized form so that recognizers look tokens up
//! directly, without re-normalizing table entries per query.

use std::collections::{HashMap, HashSet};

use nlq_types::StockStatus;
use regex::Regex;
use smallvec::SmallVec;

use crate::normalize::Token;

/// One indexed phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseEntry<V> {
    /// Normalized phrase ("low stock")
    pub phrase: String,
    /// Value the phrase maps to
    pub canonical: V,
    /// Number of tokens in the phrase
    pub tokens: usize,
}

/// Hits from one scan; queries rarely produce more than a handful.
pub type PhraseHits<'a, V> = SmallVec<[PhraseHit<'a, V>; 4]>;

/// A phrase found in a token sequence.
#[derive(Debug, Clone, Copy)]
pub struct PhraseHit<'a, V> {
    /// Index of the first token
    pub first: usize,
    /// Index of the last token (inclusive)
    pub last: usize,
    pub entry: &'a PhraseEntry<V>,
}

/// Normalized phrase → value index with whole-token matching.
#[derive(Debug, Clone)]
pub struct PhraseTable<V> {
    entries: HashMap<String, PhraseEntry<V>>,
    max_tokens: usize,
}

impl<V> Default for PhraseTable<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            max_tokens: 0,
        }
    }
}

impl<V> PhraseTable<V> {
    pub(crate) fn insert(&mut self, phrase: String, canonical: V) {
        let tokens = phrase.split(' ').count();
        self.max_tokens = self.max_tokens.max(tokens);
        self.entries.insert(
            phrase.clone(),
            PhraseEntry {
                phrase,
                canonical,
                tokens,
            },
        );
    }

    pub fn get(&self, phrase: &str) -> Option<&PhraseEntry<V>> {
        self.entries.get(phrase)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest phrase length in tokens.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every n-gram of `tokens` that is an indexed phrase.
    ///
    /// Hits may overlap; resolving them is the merger's job.
    pub fn scan<'a>(&'a self, tokens: &[Token]) -> PhraseHits<'a, V> {
        let mut hits = PhraseHits::new();
        if self.entries.is_empty() {
            return hits;
        }

        for first in 0..tokens.len() {
            let longest = self.max_tokens.min(tokens.len() - first);
            let mut key = String::new();
            for n in 1..=longest {
                if n > 1 {
                    key.push(' ');
                }
                key.push_str(&tokens[first + n - 1].text);
                if let Some(entry) = self.entries.get(&key) {
                    hits.push(PhraseHit {
                        first,
                        last: first + n - 1,
                        entry,
                    });
                }
            }
        }

        hits
    }
}

/// Compiled lexicon shared by every parse.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// SHA-256 over the source tables (hex)
    pub hash: String,

    // =========================================================================
    // Phrase indexes
    // =========================================================================
    pub component_types: PhraseTable<String>,
    pub stock_status: PhraseTable<StockStatus>,
    pub package_generic: PhraseTable<String>,
    pub manufacturers: PhraseTable<String>,
    pub price_keywords: PhraseTable<String>,

    // =========================================================================
    // Token sets
    // =========================================================================
    pub package_codes: HashSet<String>,
    pub package_bare_families: HashSet<String>,
    pub filler_words: HashSet<String>,
    /// Tokens owned by some table; never captured as a free-form location
    pub(crate) reserved: HashSet<String>,

    // =========================================================================
    // Patterns built from table content
    // =========================================================================
    /// `<family>-?<number>` ("sot-23", "to220")
    pub(crate) package_family: Option<Regex>,
    /// `<prefix>[- ]?<code>` ("bin-23", "drawer 3")
    pub(crate) location_prefix: Option<Regex>,
}

impl Lexicon {
    pub fn is_filler(&self, token: &str) -> bool {
        self.filler_words.contains(token)
    }

    pub fn is_reserved(&self, token: &str) -> bool {
        self.reserved.contains(token)
    }

    /// Entry counts per table, for diagnostics.
    pub fn table_sizes(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("component_types", self.component_types.len()),
            ("stock_status", self.stock_status.len()),
            ("package_codes", self.package_codes.len()),
            ("package_bare_families", self.package_bare_families.len()),
            ("package_generic", self.package_generic.len()),
            ("manufacturers", self.manufacturers.len()),
            ("price_keywords", self.price_keywords.len()),
            ("filler_words", self.filler_words.len()),
        ]
    }
}
