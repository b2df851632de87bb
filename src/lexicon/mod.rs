//! Lexicon: the lookup tables behind the recognizers.
//!
//! Tables are authored as [`LexiconConfig`] (built-in defaults or YAML under
//! `config/lexicon/`), compiled once by [`LexiconCompiler`] into an
//! immutable [`Lexicon`], and shared read-only via `Arc<Lexicon>`.

mod compiler;
mod snapshot;
mod types;

pub use compiler::{compile, LexiconCompiler};
pub use snapshot::{Lexicon, PhraseEntry, PhraseHit, PhraseHits, PhraseTable};
pub use types::{AliasTable, LexiconConfig, LexiconPatch, PackageTables};
